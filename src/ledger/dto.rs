use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// "YYYY-MM-DD"; defaults to today when omitted.
    pub date: Option<String>,
}
