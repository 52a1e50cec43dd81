// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring and ranking: from candidates to an ordered result list.
//!
//! The key rules: tiers don't stack per term (the best one wins), scores add
//! across terms and fields, field weights multiply, and the exclusion veto
//! overrides everything by zeroing the item. Ranking then drops the zeros,
//! sorts stably, and truncates.

mod core;
pub mod ranking;

pub use core::*;
