//! Pairing of merged spans into menu records.

use crate::merge::MergedSpan;
use crate::text;
use serde::{Deserialize, Serialize};

/// An item name with the price printed after it.
///
/// The price stays a string so `3,50` and `3.50` come out as they were read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    #[serde(default)]
    pub price: Option<String>,
}

impl Record {
    pub fn priced(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: Some(price.into()),
        }
    }

    pub fn unpriced(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: None,
        }
    }

    pub fn has_price(&self) -> bool {
        self.price.is_some()
    }
}

/// Greedy pairing of each span with the numeric span right after it.
///
/// Spans without a following price are kept with `price: None`; this is the
/// intermediate view, [`segment`] is what callers normally want.
pub fn pair(spans: &[MergedSpan]) -> Vec<Record> {
    let mut records = Vec::with_capacity(spans.len());
    let mut i = 0;

    while i < spans.len() {
        let name = spans[i].text.clone();
        match spans.get(i + 1).filter(|next| text::is_numeric(&next.text)) {
            Some(price) => {
                records.push(Record::priced(name, price.text.clone()));
                i += 2;
            }
            None => {
                records.push(Record::unpriced(name));
                i += 1;
            }
        }
    }

    records
}

/// Records that found a price; labels left without one are dropped.
pub fn segment(spans: &[MergedSpan]) -> Vec<Record> {
    pair(spans).into_iter().filter(Record::has_price).collect()
}
