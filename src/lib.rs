// ============================================================
//  lib.rs - Biblioteca aclgrep
// ============================================================
//
//  Extrage câmpurile din liniile ACL de router (rețele, porturi,
//  protocol, acțiune) și răspunde la două întrebări:
//    - se potrivește regula cu filtrul dat?          (matcher)
//    - o regulă o acoperă complet pe alta?           (containment)
//
//  Concepte Rust demonstrate aici:
//  - Crate cu bibliotecă + binar: `main.rs` folosește doar API-ul public
//  - `pub use` pentru re-exportarea tipurilor principale la rădăcină
// ============================================================

pub mod config;
pub mod containment;
pub mod error;
pub mod matcher;
pub mod network;
pub mod parser;
pub mod ports;
pub mod rule;
pub mod scan;

pub use config::Config;
pub use containment::{contains, find_redundant, find_redundant_parallel, Redundancy};
pub use error::AclError;
pub use matcher::{grep_line, matches, Query};
pub use network::NetworkSpec;
pub use parser::{create_parser, AclParser, ExtractedFields, PatternSet, RuleAction};
pub use ports::PortSpec;
pub use rule::Rule;
pub use scan::{scan_rules, AclNameContext, ScannedLine, Scanner};
