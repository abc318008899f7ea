use crate::schema::query::ReportType;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

//////////////////////////////////////////////////////////////////////////////////////////////////
//
// Raw filings -> flat table
//
//////////////////////////////////////////////////////////////////////////////////////////////////

// {
//     "url": "https://lda.senate.gov/api/v1/filings/455edc06-55d1-41ed-878e-70a4040f953c/",
//     "filing_uuid": "455edc06-55d1-41ed-878e-70a4040f953c",
//     "filing_type": "MM",
//     "filing_type_display": "Mid-Year Report",
//     "filing_year": 1999,
//     "income": null,
//     "expenses": null,
//     "dt_posted": "1905-06-24T00:00:00-05:00",
//     "registrant": {
//         "id": 9181,
//         "name": "CHURCHILL GROUP",
//         ...
//     },
//     "client": {
//         "id": 113256,
//         "name": "AMERICAN FAMILY BUSINESS INST",
//         ...
//     },
//     "lobbying_activities": [ ... ],
//     ...
// },

/// A filing flattened to one level, nested keys joined with `.`
/// (e.g. `registrant.name`).
pub type Flat = Map<String, Value>;

/// Flatten a raw filing. Arrays are kept whole as leaf values; anything other
/// than an object flattens to nothing.
pub fn flatten(record: &Value) -> Flat {
    let mut flat = Flat::new();
    if let Value::Object(map) = record {
        flatten_into(&mut flat, None, map);
    }
    flat
}

fn flatten_into(flat: &mut Flat, prefix: Option<&str>, map: &Map<String, Value>) {
    for (key, val) in map {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match val {
            Value::Object(inner) => flatten_into(flat, Some(&path), inner),
            _ => {
                flat.insert(path, val.clone());
            }
        }
    }
}

// money arrives as decimal strings ("50000.00"), occasionally as numbers
fn amount(val: Option<&Value>) -> Option<f64> {
    let amount: f64 = match val? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    // "NaN" and "inf" parse as floats
    amount.is_finite().then_some(amount)
}

/// `income` where set, else `expenses`, else 0.
pub fn amount_reported(flat: &Flat) -> f64 {
    amount(flat.get("income"))
        .or_else(|| amount(flat.get("expenses")))
        .unwrap_or(0.0)
}

/// Output columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    RegistrantName,
    ClientName,
    ReportType,
    AmountReported,
    FilingYear,
    Posted,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::RegistrantName,
        Column::ClientName,
        Column::ReportType,
        Column::AmountReported,
        Column::FilingYear,
        Column::Posted,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::RegistrantName => "Registrant Name",
            Column::ClientName => "Client Name",
            Column::ReportType => "Report Type",
            Column::AmountReported => "Amount Reported",
            Column::FilingYear => "Filing Year",
            Column::Posted => "Posted",
        }
    }

    /// Flattened key the column is read from; `None` for derived columns.
    pub fn source_key(&self) -> Option<&'static str> {
        match self {
            Column::RegistrantName => Some("registrant.name"),
            Column::ClientName => Some("client.name"),
            Column::ReportType => Some("filing_type"),
            Column::AmountReported => None,
            Column::FilingYear => Some("filing_year"),
            Column::Posted => Some("dt_posted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub registrant_name: Option<String>,
    pub client_name: Option<String>,
    pub report_type: Option<String>,
    pub amount_reported: f64,
    pub filing_year: Option<i64>,
    pub posted: Option<String>,
}

fn text(val: Option<&Value>) -> Option<String> {
    match val? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn year(val: Option<&Value>) -> Option<i64> {
    match val? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Row {
    pub fn from_flat(flat: &Flat) -> Self {
        Self {
            registrant_name: text(flat.get("registrant.name")),
            client_name: text(flat.get("client.name")),
            report_type: text(flat.get("filing_type")),
            amount_reported: amount_reported(flat),
            filing_year: year(flat.get("filing_year")),
            posted: text(flat.get("dt_posted")),
        }
    }

    /// Raw cell value as text; `None` for a missing value.
    pub fn cell(&self, column: Column) -> Option<String> {
        match column {
            Column::RegistrantName => self.registrant_name.clone(),
            Column::ClientName => self.client_name.clone(),
            Column::ReportType => self.report_type.clone(),
            Column::AmountReported => Some(self.amount_reported.to_string()),
            Column::FilingYear => self.filing_year.map(|y| y.to_string()),
            Column::Posted => self.posted.clone(),
        }
    }
}

/// Normalized search result: the columns present plus one row per filing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(Column::header).collect()
    }

    /// Client-side `filing_type` filter for when more than one report type was
    /// selected (the API only filters on one). Smaller selections were
    /// already applied server-side, so this is a no-op for them.
    pub fn retain_report_types(&mut self, selected: &BTreeSet<ReportType>) {
        if selected.len() <= 1 {
            return;
        }
        self.rows.retain(|row| {
            row.report_type
                .as_deref()
                .is_some_and(|rt| selected.iter().any(|s| s.code() == rt))
        });
    }
}

/// Build a fresh table from raw filings. A column appears when any filing
/// carries its source key; Amount Reported is always present.
pub fn normalize(records: &[Value]) -> Table {
    let flat: Vec<Flat> = records.iter().map(flatten).collect();

    let columns = Column::ALL
        .into_iter()
        .filter(|col| match col.source_key() {
            Some(key) => flat.iter().any(|f| f.contains_key(key)),
            None => true,
        })
        .collect();
    let rows = flat.iter().map(Row::from_flat).collect();

    Table { columns, rows }
}
