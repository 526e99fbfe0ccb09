//! Olympic athlete/event explorer.
//!
//! [`data`] holds the dataset provider and the aggregation layer; [`state`]
//! tracks dashboard selections and assembles the page views.

pub mod config;
pub mod data;
pub mod state;
