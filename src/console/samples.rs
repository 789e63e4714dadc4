use crate::error::{PlaygroundError, Result};
use std::fmt;
use std::str::FromStr;

const BASIC: &[&str] = &[
    "SELECT * FROM employees LIMIT 10;",
    "SELECT name, salary\nFROM employees\nWHERE salary > 60000\nORDER BY salary DESC;",
    "SELECT COUNT(*) as total_employees\nFROM employees\nWHERE status = 'active';",
];

const JOINS: &[&str] = &[
    "SELECT e.name, d.name as department\nFROM employees e\nINNER JOIN departments d ON e.department_id = d.id\nLIMIT 15;",
    "SELECT p.name as product, s.name as supplier, s.country\nFROM products p\nLEFT JOIN suppliers s ON p.supplier_id = s.id\nWHERE p.category = 'Electronics'\nLIMIT 15;",
    "SELECT e.name as employee, d.name as department, COUNT(s.id) as total_sales\nFROM employees e\nLEFT JOIN departments d ON e.department_id = d.id\nLEFT JOIN sales s ON e.id = s.employee_id\nGROUP BY e.id, e.name, d.name\nORDER BY total_sales DESC\nLIMIT 10;",
];

const AGGREGATIONS: &[&str] = &[
    "SELECT d.name as department, AVG(e.salary) as avg_salary\nFROM employees e\nJOIN departments d ON e.department_id = d.id\nGROUP BY d.id, d.name\nORDER BY avg_salary DESC;",
    "SELECT category, SUM(stock) as total_stock, COUNT(*) as products\nFROM products\nGROUP BY category\nORDER BY total_stock DESC;",
    "SELECT DATE(sale_date) as day, SUM(total_amount) as daily_revenue\nFROM sales\nGROUP BY DATE(sale_date)\nORDER BY day DESC\nLIMIT 10;",
];

const ADVANCED: &[&str] = &[
    "WITH top_sellers AS (\n  SELECT employee_id, SUM(total_amount) as total\n  FROM sales\n  GROUP BY employee_id\n)\nSELECT e.name, e.position, ts.total as total_sales\nFROM employees e\nJOIN top_sellers ts ON e.id = ts.employee_id\nORDER BY ts.total DESC\nLIMIT 10;",
    "SELECT name, salary,\n       (SELECT AVG(salary) FROM employees) as company_avg\nFROM employees\nWHERE salary > (SELECT AVG(salary) FROM employees)\nORDER BY salary DESC\nLIMIT 10;",
    "SELECT p.name, p.stock,\n       COALESCE(s.name, 'No Supplier') as supplier,\n       CASE\n         WHEN p.stock < 30 THEN 'Low Stock'\n         WHEN p.stock < 100 THEN 'Medium Stock'\n         ELSE 'High Stock'\n       END as stock_status\nFROM products p\nLEFT JOIN suppliers s ON p.supplier_id = s.id\nWHERE p.stock < 50\nORDER BY p.stock ASC\nLIMIT 15;",
];

/// Groups of canned queries offered by the example picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExampleCategory {
    Basic,
    Joins,
    Aggregations,
    Advanced,
}

impl ExampleCategory {
    pub const ALL: [ExampleCategory; 4] = [
        ExampleCategory::Basic,
        ExampleCategory::Joins,
        ExampleCategory::Aggregations,
        ExampleCategory::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExampleCategory::Basic => "basic",
            ExampleCategory::Joins => "joins",
            ExampleCategory::Aggregations => "aggregations",
            ExampleCategory::Advanced => "advanced",
        }
    }

    pub fn queries(&self) -> &'static [&'static str] {
        match self {
            ExampleCategory::Basic => BASIC,
            ExampleCategory::Joins => JOINS,
            ExampleCategory::Aggregations => AGGREGATIONS,
            ExampleCategory::Advanced => ADVANCED,
        }
    }
}

impl fmt::Display for ExampleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExampleCategory {
    type Err = PlaygroundError;

    fn from_str(s: &str) -> Result<Self> {
        ExampleCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PlaygroundError::UnknownExample(s.to_string()))
    }
}

/// Looks up one canned query by category and zero-based position.
pub fn example(category: ExampleCategory, index: usize) -> Result<&'static str> {
    category.queries().get(index).copied().ok_or_else(|| {
        PlaygroundError::UnknownExample(format!("{} #{}", category, index))
    })
}
