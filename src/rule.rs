// ============================================================
//  rule.rs - Regula ACL normalizată
// ============================================================
//
//  O regulă se construiește dintr-o linie brută: extractor ->
//  normalizare rețele -> evaluare porturi. Odată construită este
//  imutabilă; o linie nouă produce întotdeauna o regulă nouă.
//
//  Concepte Rust demonstrate aici:
//  - `Option<Result<T>>`: câmp absent / câmp valid / câmp invalid,
//    fiecare distins în tipuri, fără valori speciale
//  - `?` pentru propagarea erorii din `validate`
//  - Erorile stau pe câmp, nu pe linie: o valoare invalidă contează
//    doar când o clauză chiar o citește
// ============================================================

use crate::error::{AclError, Result};
use crate::network::{self, NetworkSpec};
use crate::parser::{AclParser, ExtractedFields, RuleAction};
use crate::ports::PortSpec;

/// Un câmp normalizat: `None` dacă lipsește din linie, `Some(Err)` dacă
/// textul găsit nu a putut fi normalizat.
pub type Field<T> = Option<Result<T>>;

// ---------------------------------------------------------------------------
// Regula completă
//
// `action` este `None` când linia nu are permit/deny pe poziția de regulă;
// grep nu are nevoie de acțiune, containment-ul o cere pe ambele reguli.
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub action: Option<RuleAction>,
    pub protocol: Option<String>,
    pub source: Field<NetworkSpec>,
    pub destination: Field<NetworkSpec>,
    pub source_port: Field<PortSpec>,
    pub destination_port: Field<PortSpec>,
    pub extra: Option<String>,
    pub original_line: String,
}

impl Rule {
    /// Parsează o linie completă cu parser-ul dat
    pub fn parse(parser: &dyn AclParser, line: &str) -> Result<Rule> {
        Rule::from_fields(parser.extract(line), line)
    }

    /// Normalizează câmpurile deja extrase.
    ///
    /// Singura eroare este `NotARule`: linia nu are nici acțiune, nici
    /// vreo rețea (header, remark, comentariu). Adresele și porturile
    /// invalide rămân atașate câmpului lor - vezi `validate`.
    pub fn from_fields(fields: ExtractedFields, line: &str) -> Result<Rule> {
        if fields.action.is_none() && fields.source_net.is_none() && fields.dest_net.is_none() {
            return Err(AclError::NotARule);
        }

        Ok(Rule {
            action: fields.action,
            protocol: fields.protocol,
            source: fields.source_net.as_deref().map(network::normalize),
            destination: fields.dest_net.as_deref().map(network::normalize),
            source_port: fields.source_port.as_deref().map(PortSpec::parse),
            destination_port: fields.dest_port.as_deref().map(PortSpec::parse),
            extra: fields.extra,
            original_line: line.trim_end().to_string(),
        })
    }

    /// Prima eroare de normalizare, în ordinea: sursă, destinație, port
    /// sursă, port destinație. Uniq compară doar reguli fără erori.
    pub fn validate(&self) -> Result<()> {
        check(&self.source)?;
        check(&self.destination)?;
        check(&self.source_port)?;
        check(&self.destination_port)
    }

    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    /// `true` dacă sursa sau destinația este rețeaua "any"
    pub fn touches_any(&self) -> bool {
        is_any(&self.source) || is_any(&self.destination)
    }
}

fn check<T>(field: &Field<T>) -> Result<()> {
    match field {
        Some(Err(err)) => Err(err.clone()),
        _ => Ok(()),
    }
}

fn is_any(field: &Field<NetworkSpec>) -> bool {
    matches!(field, Some(Ok(net)) if net.is_any())
}
