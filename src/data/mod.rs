//! Data layer: instrument readers, writers and export adapters.
//!
//! Architecture:
//! ```text
//!  result .csv / data .csv / specan .xml / .bin
//!        │
//!        ▼
//!   ┌──────────┐     ┌──────────┐
//!   │  loader   │ ──▶ │  schema   │  keyed header lines → HeaderMetadata
//!   └──────────┘     └──────────┘
//!        │
//!        ▼
//!   ┌──────────────────┐
//!   │ Trace / TimeData  │  frequency axis + power, or IQ samples
//!   └──────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐   ┌──────────┐
//!   │  writer   │   │  export   │  .bin/.csv/.wav │ parquet/json
//!   └──────────┘   └──────────┘
//! ```

pub mod export;
pub mod loader;
pub mod model;
pub mod schema;
pub mod writer;
