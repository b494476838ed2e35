use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// How overtime is charged once the actual return runs past the scheduled
/// end: a percentage of the daily rate per overdue hour, or a flat amount per
/// overdue hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OvertimePolicy {
    Percentage(BigDecimal),
    Nominal(BigDecimal),
}

impl Default for OvertimePolicy {
    fn default() -> Self {
        OvertimePolicy::Percentage(BigDecimal::from(10))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub company_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub rental_packages: Vec<String>,
    pub car_categories: Vec<String>,
    pub overtime: OvertimePolicy,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            company_name: "Rental".to_string(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            rental_packages: vec!["12 Hour".to_string(), "24 Hour".to_string()],
            car_categories: vec![
                "City Car".to_string(),
                "MPV".to_string(),
                "SUV".to_string(),
            ],
            overtime: OvertimePolicy::default(),
        }
    }
}
