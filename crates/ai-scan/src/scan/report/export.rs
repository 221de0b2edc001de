use crate::scan::result::{DomainResult, ItemResult};

pub const CSV_HEADER: [&str; 6] = [
    "Domain",
    "Question ID",
    "Question text",
    "Answer",
    "Item score (0-100)",
    "Weight",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV buffer: {0}")]
    Flush(#[source] std::io::Error),
    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Semicolon separated export, one row per question in survey order.
/// Unanswered and excluded questions still get a row with an empty score.
pub fn to_csv(domains: &[DomainResult]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for domain in domains {
        for item in &domain.items {
            writer.write_record(row(domain, item))?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

fn row(domain: &DomainResult, item: &ItemResult) -> [String; 6] {
    [
        single_line(&domain.title),
        single_line(&item.id),
        single_line(&item.text),
        item.raw_answer
            .as_ref()
            .map(|answer| single_line(&answer.to_string()))
            .unwrap_or_default(),
        item.item_score
            .map(|score| score.to_string())
            .unwrap_or_default(),
        item.weight.to_string(),
    ]
}

fn single_line(value: &str) -> String {
    value.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
