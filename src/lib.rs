//! Semantic search for photo collections, backed by a local SQLite catalog.
//!
//! Viewfinder indexes every photo twice: once as text (title plus
//! description) and once as pixels, both through a multimodal embedding
//! model ([Voyage AI](https://docs.voyageai.com/)'s `voyage-multimodal-3`
//! by default). Natural language queries and reference images then rank
//! the catalog by cosine similarity, entirely inside the database.
//!
//! # Architecture
//!
//! - **Storage**: SQLite with [sqlite-vec](https://github.com/asg017/sqlite-vec)
//!   virtual tables, one per modality, so text queries never match on pixels
//! - **Embeddings**: Voyage AI multimodal API, with a deterministic mock
//!   provider when no API key is configured
//! - **Ranking**: KNN over unit-length vectors; L2 distances convert back
//!   to cosine similarities arithmetically, no full-collection scan
//! - **Transport**: HTTP JSON API (axum) plus a small CLI
//!
//! # Modules
//!
//! - [`config`]: configuration loading from TOML files and environment variables
//! - [`db`]: SQLite database initialization, schema, migrations, and health checks
//! - [`embedding`]: multimodal embedding providers (Voyage AI and mock)
//! - [`imaging`]: image decode, downscale, thumbnail, and data-URI encoding
//! - [`catalog`]: the photo engine: ingest, similarity search, browsing,
//!   usage metrics, and aggregate statistics

pub mod catalog;
pub mod config;
pub mod db;
pub mod embedding;
pub mod imaging;
