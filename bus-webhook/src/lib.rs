//! Voice-assistant webhook answering "when does the bus to X leave?".
//!
//! Departures of the configured stops are fetched from the Digitransit
//! GraphQL API at startup, matched to their routes by headsign, and held in
//! memory. Dialogflow fulfillment requests are resolved against that corpus.

pub mod config;
pub mod corpus;
pub mod digitransit;
pub mod domain;
pub mod logging;
pub mod matching;
pub mod resolver;
pub mod web;
