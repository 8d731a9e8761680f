pub mod errors;

use postgres::{Client, NoTls};
use postgres::types::ToSql;
use crate::config::DatabaseParameters;
use crate::manager_timescale::errors::TimescaleError;
use crate::models::pv_forecast::{METRIC_COLUMNS, PvForecastEntry};

/// Struct for persisting forecast entries in a TimescaleDB hypertable
pub struct Timescale {
    connection_string: String,
    table_name: String,
}

impl Timescale {
    /// Returns a Timescale struct ready for persisting forecast batches
    ///
    /// # Arguments
    ///
    /// * 'database' - database parameters
    pub fn new(database: &DatabaseParameters) -> Timescale {
        Timescale {
            connection_string: database.connection_string.clone(),
            table_name: database.table_name.clone(),
        }
    }

    /// Persists a batch of forecast entries in one connection and one
    /// transaction.
    ///
    /// Each entry is upserted by its timestamp where a conflict overwrites
    /// every metric column with the new values, including overwriting a
    /// stored value with NULL. The transaction commits only after all rows
    /// succeeded, so a failing row discards the whole batch.
    ///
    /// # Arguments
    ///
    /// * 'entries' - the forecast entries to persist, in document order
    pub fn persist(&self, entries: &[PvForecastEntry]) -> Result<(), TimescaleError> {
        let mut client = Client::connect(&self.connection_string, NoTls)?;
        let mut transaction = client.transaction()?;

        let statement = transaction.prepare(&upsert_sql(&self.table_name))?;
        for entry in entries {
            let metrics = entry.metrics();
            let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(METRIC_COLUMNS.len() + 1);
            params.push(&entry.time);
            for metric in &metrics {
                params.push(metric);
            }

            transaction.execute(&statement, &params)?;
        }

        transaction.commit()?;

        Ok(())
    }
}

/// Builds the upsert statement for the forecast table, one parameter for
/// the timestamp followed by one per metric column in `METRIC_COLUMNS` order
///
/// # Arguments
///
/// * 'table_name' - the table to upsert into
fn upsert_sql(table_name: &str) -> String {
    let columns = METRIC_COLUMNS.join(", ");
    let placeholders = (0..METRIC_COLUMNS.len())
        .map(|i| format!("${}", i + 2))
        .collect::<Vec<String>>()
        .join(", ");
    let updates = METRIC_COLUMNS
        .iter()
        .map(|c| format!("{} = EXCLUDED.{}", c, c))
        .collect::<Vec<String>>()
        .join(", ");

    format!(
        "INSERT INTO {} (time, {}) VALUES ($1, {}) ON CONFLICT (time) DO UPDATE SET {}",
        table_name, columns, placeholders, updates,
    )
}
