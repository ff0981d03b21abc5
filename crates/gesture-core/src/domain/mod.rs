//! Domain entities for gesture-driven pointer control.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain**.  Domain code has **no** imports from OS
//! APIs, network libraries, or UI frameworks, and can be compiled and tested
//! on any platform without any external setup.
//!
//! Here the domain is: what a gesture observation *is*, how displays are
//! ordered and addressed, and the numerical rules (accumulation, smoothing)
//! that turn a jittery observation stream into stable discrete steps.

/// Delta accumulation with remainder carry (zoom and scroll channels).
pub mod accumulator;
/// The decoded gesture observation and its enums.
pub mod gesture;
/// Cursor / laser-pointer control mode.
pub mod mode;
/// Physical display geometry and the primary-first screen ordering.
pub mod screen;
/// Tuning parameters shared by the adapter and the controller.
pub mod settings;
/// Exponential moving-average position smoothing.
pub mod smoothing;
