//! # Cross-Module Test Suite
//!
//! Unit tests live beside the code they cover. This directory holds the
//! shared test doubles and scenarios that push real upstream payloads through
//! parsing, layout and rendering into a recorded panel frame.

pub mod support;
