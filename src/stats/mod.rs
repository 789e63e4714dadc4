use crate::engine::{Engine, Value};
use crate::error::Result;
use crate::render::{format_integer, format_number};
use serde::Serialize;
use tracing::warn;

/// One single-value summary shown in the stats panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatWidget {
    pub label: &'static str,
    pub icon: &'static str,
    pub query: &'static str,
    pub prefix: Option<&'static str>,
}

pub const DEFAULT_WIDGETS: &[StatWidget] = &[
    StatWidget {
        label: "Total Employees",
        icon: "👥",
        query: "SELECT COUNT(*) FROM employees WHERE status='active'",
        prefix: None,
    },
    StatWidget {
        label: "Total Products",
        icon: "📦",
        query: "SELECT COUNT(*) FROM products",
        prefix: None,
    },
    StatWidget {
        label: "Total Sales",
        icon: "💳",
        query: "SELECT COUNT(*) FROM sales",
        prefix: None,
    },
    StatWidget {
        label: "Total Revenue",
        icon: "💰",
        query: "SELECT ROUND(SUM(total_amount), 2) FROM sales",
        prefix: Some("$"),
    },
    StatWidget {
        label: "Avg Salary",
        icon: "💵",
        query: "SELECT ROUND(AVG(salary), 0) FROM employees",
        prefix: Some("$"),
    },
    StatWidget {
        label: "Departments",
        icon: "🏢",
        query: "SELECT COUNT(*) FROM departments",
        prefix: None,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatValue {
    pub label: &'static str,
    pub icon: &'static str,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StatsPanel {
    Ready(Vec<StatValue>),
    /// Any widget failing collapses the whole panel into one notice.
    Unavailable,
}

impl StatsPanel {
    pub const UNAVAILABLE_NOTICE: &'static str = "Error loading stats";

    pub fn values(&self) -> &[StatValue] {
        match self {
            StatsPanel::Ready(values) => values,
            StatsPanel::Unavailable => &[],
        }
    }
}

pub struct StatsSummarizer<'a> {
    engine: &'a Engine,
    widgets: &'a [StatWidget],
}

impl<'a> StatsSummarizer<'a> {
    pub fn new(engine: &'a Engine) -> Self {
        Self::with_widgets(engine, DEFAULT_WIDGETS)
    }

    pub fn with_widgets(engine: &'a Engine, widgets: &'a [StatWidget]) -> Self {
        Self { engine, widgets }
    }

    pub fn refresh(&self) -> StatsPanel {
        match self.compute() {
            Ok(values) => StatsPanel::Ready(values),
            Err(e) => {
                warn!(error = %e, "Stats refresh failed");
                StatsPanel::Unavailable
            }
        }
    }

    fn compute(&self) -> Result<Vec<StatValue>> {
        self.widgets
            .iter()
            .map(|widget| {
                let results = self.engine.exec(widget.query)?;
                let value = results
                    .first()
                    .and_then(|r| r.first_cell())
                    .cloned()
                    .unwrap_or(Value::Null);
                Ok(StatValue {
                    label: widget.label,
                    icon: widget.icon,
                    display: display_value(&value, widget.prefix),
                })
            })
            .collect()
    }
}

// Absent and NULL values both show as 0. A prefixed widget coerces text to a
// number first; unprefixed text is shown as-is.
fn display_value(value: &Value, prefix: Option<&str>) -> String {
    let formatted = match (value, prefix) {
        (Value::Null, _) => format_integer(0),
        (Value::Integer(i), _) => format_integer(*i),
        (Value::Real(f), _) => format_number(*f),
        (text @ Value::Text(_), Some(_)) => text
            .as_f64()
            .map(format_number)
            .unwrap_or_else(|| "NaN".to_string()),
        (Value::Text(s), None) => s.clone(),
    };

    match prefix {
        Some(prefix) => format!("{}{}", prefix, formatted),
        None => formatted,
    }
}
