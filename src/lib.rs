//! Core logic for an event-hotel booking widget: a static catalog of mock
//! hotels around the venue, deterministic detail expansion and urgency
//! signals, search filters, a scripted assistant, a three-way comparison
//! and quote engine, and simulated export/share flows. A presentation
//! layer renders the state and calls the operations; no networking, no
//! persistence.

pub mod data;
pub mod models;
pub mod services;
pub mod widget;

pub use data::Catalog;
pub use widget::BookingWidget;
