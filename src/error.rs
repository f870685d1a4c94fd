// ============================================================
//  error.rs - Tipurile de eroare ale bibliotecii de parsare ACL
// ============================================================
//
//  Nicio eroare de aici nu oprește o scanare: granița per-linie
//  (matcher / scanner) transformă orice `AclError` într-o linie
//  sărită sau într-un "nu se potrivește".
//
//  Măștile malformate NU sunt erori - ele devin santinela
//  "never match" din `network.rs`.
//
//  Concepte Rust demonstrate aici:
//  - `thiserror`: mesajele de eroare declarate lângă variante
//  - `#[from]` pentru conversia automată a erorilor regex la `?`
//  - Alias de tip `Result<T>` pentru tot crate-ul
// ============================================================

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AclError {
    /// Octet ne-numeric, octet > 255, număr greșit de octeți sau prefix CIDR invalid
    #[error("adresă IP invalidă: '{0}'")]
    InvalidAddress(String),

    /// O valoare numerică dintr-o clauză de port nu a putut fi parsată
    #[error("valoare de port invalidă în clauza '{0}'")]
    UnparsableNumeric(String),

    /// Linia nu are nici permit/deny pe poziția de regulă, nici rețele (header, remark, etc.)
    #[error("linia nu este o regulă ACL")]
    NotARule,

    /// Un nume de serviciu din configurație a produs un pattern regex invalid
    #[error("pattern invalid: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, AclError>;
