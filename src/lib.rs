//! Timeline editing engine for simai charts.
//!
//! A simai chart and its audio track are edited as a pair: cropping a time
//! window, uniformly time-scaling, or splicing two songs together must keep
//! both sides synchronized. This crate owns the chart half of that contract.
//! It models one chart as a [`chart::ChartDocument`] (seven difficulty
//! slots, each an ordered timeline of note and comma events) and provides
//! pure transforms over it:
//!
//! - [`edit::crop()`] restricts a document to a time window, snapping the
//!   window edges to the tempo grid and truncating holds and slides that
//!   straddle a boundary.
//! - [`edit::scale()`] accelerates or decelerates the whole timeline by a
//!   uniform factor.
//! - [`edit::concatenate`] splices one chart after another with a controlled
//!   gap, phrased either as a synthetic tempo marker or as whole-beat
//!   spacer notes.
//!
//! Every transform takes a document by reference and returns a new one; the
//! input is never mutated. After any transform the event lists are sorted by
//! time and each content-bearing track ends with exactly one `E` terminator
//! marker.
//!
//! Parsing simai text into the model, serializing it back, and touching
//! audio bytes are collaborator concerns behind the [`external::ChartCodec`]
//! and [`external::AudioBackend`] traits. [`processor::SongProcessor`]
//! composes those collaborators with the transforms so a whole song+chart
//! pair is edited in one call.

pub mod chart;
pub mod edit;
pub mod external;
pub mod prelude;
pub mod processor;
pub mod timing;
