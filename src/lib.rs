//! First Tier - AI Support Triage Service
//!
//! Classifies inbound customer-support emails, escalates high-priority
//! issues straight to a scheduled call, and guides the rest through a
//! bounded clarification dialogue before handing off to a human team.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
