//! Filter, refresh and dump steps shared by the list data sources

use super::{check_filter_names, filter_models, write_to_file, DataSourceFilter};
use crate::datasource::{Attribute, Diagnostics, IdStrategy};
use serde::Serialize;
use std::collections::BTreeMap;

/// Computed part of a list data source after a refresh
#[derive(Debug, Clone, PartialEq)]
pub struct Refreshed<M> {
    pub id: String,
    pub items: Vec<M>,
}

/// Apply the user filters and assign the refresh id
///
/// `attributes` are the nested attributes of one listed item; filter names
/// are checked against them whether or not any items came back.
pub fn refresh_list<M: Serialize>(
    diags: &mut Diagnostics,
    filters: Option<&[DataSourceFilter]>,
    attributes: &BTreeMap<String, Attribute>,
    items: Vec<M>,
    id_strategy: IdStrategy,
) -> Option<Refreshed<M>> {
    let filters = filters.unwrap_or_default();
    let items = match check_filter_names(filters, attributes).and_then(|()| filter_models(filters, items)) {
        Ok(items) => items,
        Err(e) => {
            diags.add_error("Invalid filter", format!("{:#}", e));
            return None;
        }
    };

    match id_strategy.refresh_id(&items) {
        Ok(id) => Some(Refreshed { id, items }),
        Err(e) => {
            diags.add_error("Failed to compute id", e.to_string());
            None
        }
    }
}

/// Write the list to `output_file` when one is given
pub fn dump_output<O: Serialize>(diags: &mut Diagnostics, output_file: Option<&str>, items: &[O]) {
    let Some(path) = output_file.filter(|p| !p.is_empty()) else {
        return;
    };

    if let Err(e) = write_to_file(path, &items) {
        diags.add_error("Failed to write output_file", format!("{:#}", e));
    }
}
