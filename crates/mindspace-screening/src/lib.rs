//! mindspace-screening
//!
//! The depression screening session: countdown timer, question navigation,
//! answer store, and the single-flight submission service. Independent of
//! any rendering layer; the front end drives a [`service::Screening`] and
//! re-renders from its published [`session::SessionView`].

pub mod answers;
pub mod backend;
pub mod error;
pub mod navigation;
pub mod service;
pub mod session;
pub mod timer;
