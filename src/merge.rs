use log::warn;

use crate::{
    error::{ReportError, ReportResult},
    frequency::FieldFrequencies,
    layout::Policy,
    model::TableProfile,
};

/// Attaches histograms to the table's declared fields. Never creates fields:
/// a histogram for an undeclared field is dropped or rejected per `policy`.
/// Returns the number of fields that received a histogram.
pub fn merge_frequencies(
    table: &mut TableProfile,
    frequencies: FieldFrequencies,
    policy: Policy,
) -> ReportResult<usize> {
    let mut merged = 0;
    for (field, histogram) in frequencies {
        match table.fields.get_mut(&field) {
            Some(profile) => {
                profile.frequencies = Some(histogram);
                merged += 1;
            }
            None => match policy {
                Policy::Fail => {
                    return Err(ReportError::UnknownFieldInFrequencyTable {
                        table: table.name.clone(),
                        field,
                    });
                }
                Policy::Skip => warn!(
                    "Skipping frequencies for undeclared field '{field}' in table '{}'",
                    table.name
                ),
            },
        }
    }
    Ok(merged)
}
