//! Output generation.
//!
//! - [`markdown`]: Renders stored articles as a categorized reading digest
//!   with credibility badges, verification labels and warnings
//!
//! JSON persistence of the articles themselves lives in
//! [`crate::storage::json`].

pub mod markdown;
