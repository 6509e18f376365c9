//! Courier Ledger: package-delivery records and contractor invoicing
//!
//! Workers record how many packages they delivered each day; administrators
//! manage workers and their pay rates; anyone can produce a period invoice
//! (base pay, superannuation, GST, van-rent deduction) as HTML or PDF.
//!
//! The money arithmetic lives in [`calculation`] and has no I/O. Everything
//! else is plumbing around it: [`store`] persists users and entries in
//! SQLite, [`auth`] and [`access`] decide who may do what, [`render`] turns
//! an invoice into HTML and PDF, and [`api`] wires it all into an axum app.

#![warn(missing_docs)]

pub mod access;
pub mod api;
pub mod auth;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod store;
