use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use futures_util::TryStreamExt;
use tiberius::{ColumnData, Query};

use super::config::MssqlClient;
use crate::error::QueryError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Run a statement and collect whatever rows it returns.
///
/// Statements without a result set (DDL, most DML) produce an empty `ResultSet`.
///
/// # Errors
///
/// Returns `QueryError::Mssql` if the server rejects the statement or a row fails to decode.
pub async fn build_result_set(
    client: &mut MssqlClient,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, QueryError> {
    let query_builder = bind_query_params(query, params);
    let mut stream = query_builder.query(client).await?;

    let column_names: Option<Vec<String>> = stream
        .columns()
        .await?
        .map(|cols| cols.iter().map(|col| col.name().to_string()).collect());

    let Some(column_names) = column_names else {
        // drain so the connection is clean for the next request
        stream.into_results().await?;
        return Ok(ResultSet::default());
    };

    let col_count = column_names.len();
    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    let mut rows_stream = stream.into_row_stream();
    while let Some(row) = rows_stream.try_next().await? {
        let mut row_values = Vec::with_capacity(col_count);
        for (idx, (_col, data)) in row.cells().enumerate() {
            row_values.push(extract_value(&row, idx, data));
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

fn extract_value(row: &tiberius::Row, idx: usize, data: &ColumnData<'static>) -> RowValues {
    match data {
        ColumnData::Bit(Some(b)) => RowValues::Bool(*b),
        ColumnData::U8(Some(v)) => RowValues::Int(i64::from(*v)),
        ColumnData::I16(Some(v)) => RowValues::Int(i64::from(*v)),
        ColumnData::I32(Some(v)) => RowValues::Int(i64::from(*v)),
        ColumnData::I64(Some(v)) => RowValues::Int(*v),
        ColumnData::F32(Some(v)) => RowValues::Float(f64::from(*v)),
        ColumnData::F64(Some(v)) => RowValues::Float(*v),
        #[allow(clippy::cast_precision_loss)]
        ColumnData::Numeric(Some(n)) => {
            RowValues::Float(n.value() as f64 / 10f64.powi(i32::from(n.scale())))
        }
        ColumnData::String(Some(s)) => RowValues::Text(s.to_string()),
        ColumnData::Guid(Some(g)) => RowValues::Text(g.to_string()),
        ColumnData::Xml(Some(xml)) => RowValues::Text(xml.to_string()),
        ColumnData::Binary(Some(b)) => RowValues::Blob(b.to_vec()),
        ColumnData::DateTime(Some(_))
        | ColumnData::SmallDateTime(Some(_))
        | ColumnData::DateTime2(Some(_)) => row
            .try_get::<NaiveDateTime, _>(idx)
            .ok()
            .flatten()
            .map_or(RowValues::Null, RowValues::Timestamp),
        ColumnData::DateTimeOffset(Some(_)) => row
            .try_get::<DateTime<Utc>, _>(idx)
            .ok()
            .flatten()
            .map_or(RowValues::Null, |dt| RowValues::Timestamp(dt.naive_utc())),
        ColumnData::Date(Some(_)) => row
            .try_get::<NaiveDate, _>(idx)
            .ok()
            .flatten()
            .map_or(RowValues::Null, |d| {
                RowValues::Text(d.format("%Y-%m-%d").to_string())
            }),
        ColumnData::Time(Some(_)) => row
            .try_get::<NaiveTime, _>(idx)
            .ok()
            .flatten()
            .map_or(RowValues::Null, |t| {
                RowValues::Text(t.format("%H:%M:%S%.f").to_string())
            }),
        _ => RowValues::Null,
    }
}

/// Bind parameters directly to the query for SQL Server
pub fn bind_query_params<'a>(query: &'a str, params: &[RowValues]) -> Query<'a> {
    let mut query_builder = Query::new(query);

    for param in params {
        match param {
            RowValues::Int(i) => query_builder.bind(*i),
            RowValues::Float(f) => query_builder.bind(*f),
            RowValues::Text(s) => query_builder.bind(s.clone()),
            RowValues::Bool(b) => query_builder.bind(*b),
            RowValues::Timestamp(dt) => query_builder.bind(*dt),
            RowValues::Null => query_builder.bind(Option::<String>::None),
            RowValues::JSON(jsval) => query_builder.bind(jsval.to_string()),
            RowValues::Blob(bytes) => query_builder.bind(bytes.clone()),
        }
    }

    query_builder
}
