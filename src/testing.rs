//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides the canonical [`Searchable`] fixture so tests don't each
//! invent their own record type.

#![doc(hidden)]

use std::borrow::Cow;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

use crate::history::Clock;
use crate::types::{SearchField, Searchable};

/// A community post the way tests like them: three fields and a timestamp.
///
/// `content` and `author` are optional so the same type can stand in for
/// records that lack a field (a location entry has no author).
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePost {
    pub title: String,
    pub content: Option<String>,
    pub author: Option<String>,
    /// Millisecond timestamp for date sorting.
    pub created_at: Option<i64>,
}

impl Searchable for SamplePost {
    fn field_text(&self, field: SearchField) -> Option<Cow<'_, str>> {
        match field {
            SearchField::Title => Some(Cow::Borrowed(self.title.as_str())),
            SearchField::Content => self.content.as_deref().map(Cow::Borrowed),
            SearchField::AuthorName => self.author.as_deref().map(Cow::Borrowed),
        }
    }

    fn sort_key(&self) -> Option<i64> {
        self.created_at
    }
}

/// Create a post with all three text fields and no timestamp.
pub fn make_post(title: &str, content: &str, author: &str) -> SamplePost {
    SamplePost {
        title: title.to_string(),
        content: Some(content.to_string()),
        author: Some(author.to_string()),
        created_at: None,
    }
}

/// Create a post with a title and a creation time (millis).
pub fn make_post_at(title: &str, created_at: i64) -> SamplePost {
    SamplePost {
        title: title.to_string(),
        content: None,
        author: None,
        created_at: Some(created_at),
    }
}

/// Create a fully populated post.
pub fn make_full_post(title: &str, content: &str, author: &str, created_at: i64) -> SamplePost {
    SamplePost {
        title: title.to_string(),
        content: Some(content.to_string()),
        author: Some(author.to_string()),
        created_at: Some(created_at),
    }
}

/// Create a title-only record, like a location entry.
pub fn make_location(title: &str) -> SamplePost {
    SamplePost {
        title: title.to_string(),
        content: None,
        author: None,
        created_at: None,
    }
}

/// A [`Clock`] that only moves when a test pushes it.
pub struct FixedClock {
    epoch_ms: AtomicI64,
}

impl FixedClock {
    pub fn at_epoch_ms(epoch_ms: i64) -> Self {
        FixedClock {
            epoch_ms: AtomicI64::new(epoch_ms),
        }
    }

    pub fn advance_ms(&self, delta_ms: i64) {
        self.epoch_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let ms = self.epoch_ms.load(Ordering::SeqCst);
        Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
    }
}
