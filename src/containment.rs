// ============================================================
//  containment.rs - Detecția regulilor redundante (uniq)
// ============================================================
//
//  Regula A "conține" regula B dacă orice pachet acceptat de B este
//  acceptat și de A. O regulă anterioară care o conține pe una
//  ulterioară din același ACL face regula ulterioară inaccesibilă.
//
//  Relația NU este comutativă.
//
//  Concepte Rust demonstrate aici:
//  - `static` pentru o valoare implicită împrumutată (`ANY_PORT`)
//  - Iteratori leneși (`skip`, `filter`, `flat_map`) peste slice-uri
//  - `Arc<Vec<_>>` + `spawn_blocking`: date read-only partajate între
//    task-uri fără lock-uri
// ============================================================

use crate::network::NetworkSpec;
use crate::ports::PortSpec;
use crate::rule::{Field, Rule};
use crate::scan::ScannedLine;
use anyhow::{Context, Result};
use std::sync::Arc;

// Clauza de port lipsă, văzută ca "orice port"
static ANY_PORT: PortSpec = PortSpec::Any;

/// `true` dacă orice pachet acceptat de `other` este acceptat și de `candidate`.
///
/// Ambele reguli trebuie să aibă aceeași acțiune; o regulă fără acțiune
/// sau cu un câmp invalid nu conține și nu este conținută.
pub fn contains(candidate: &Rule, other: &Rule) -> bool {
    candidate.action.is_some()
        && candidate.action == other.action
        && protocol_contains(candidate.protocol(), other.protocol())
        && network_contains(&candidate.source, &other.source)
        && network_contains(&candidate.destination, &other.destination)
        && port_contains(&candidate.source_port, &other.source_port)
        && port_contains(&candidate.destination_port, &other.destination_port)
}

// "ip" acoperă orice protocol cunoscut
fn protocol_contains(candidate: Option<&str>, other: Option<&str>) -> bool {
    match (candidate, other) {
        (Some("ip"), Some(_)) => true,
        _ => candidate == other,
    }
}

// O rețea lipsă este comparabilă doar cu o altă rețea lipsă
fn network_contains(candidate: &Field<NetworkSpec>, other: &Field<NetworkSpec>) -> bool {
    match (candidate, other) {
        (Some(Ok(a)), Some(Ok(b))) => a.contains(b),
        (None, None) => true,
        _ => false,
    }
}

fn port_or_any(field: &Field<PortSpec>) -> Option<&PortSpec> {
    match field {
        None => Some(&ANY_PORT),
        Some(Ok(spec)) => Some(spec),
        Some(Err(_)) => None,
    }
}

fn port_contains(candidate: &Field<PortSpec>, other: &Field<PortSpec>) -> bool {
    match (port_or_any(candidate), port_or_any(other)) {
        (Some(candidate), Some(other)) => other.is_subset_of(candidate),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// O pereche (regula anterioară, regula ulterioară umbrită)
//
// Indecșii sunt poziții în lista de `ScannedLine`, nu numere de linie.
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redundancy {
    /// indexul regulii care o conține pe cealaltă
    pub earlier: usize,
    /// indexul regulii umbrite
    pub later: usize,
}

/// Regulile de după `index`, din același ACL, umbrite de regula `index`.
///
/// Funcție read-only peste o listă deja parsată - rândurile pot fi
/// evaluate în paralel.
pub fn redundancies_of(lines: &[ScannedLine], index: usize) -> Vec<Redundancy> {
    let Some(candidate) = lines.get(index) else {
        return Vec::new();
    };

    lines
        .iter()
        .enumerate()
        .skip(index + 1)
        .filter(|(_, other)| other.acl_name == candidate.acl_name)
        .filter(|(_, other)| contains(&candidate.rule, &other.rule))
        .map(|(later, _)| Redundancy { earlier: index, later })
        .collect()
}

/// Toate perechile, secvențial, ordonate după regula umbrită
pub fn find_redundant(lines: &[ScannedLine]) -> Vec<Redundancy> {
    let mut pairs: Vec<Redundancy> = (0..lines.len())
        .flat_map(|index| redundancies_of(lines, index))
        .collect();
    sort_pairs(&mut pairs);
    pairs
}

// ---------------------------------------------------------------------------
// Aceleași perechi ca `find_redundant`, calculate pe blocking pool-ul tokio.
//
// Rândurile (regula candidat) sunt împărțite în `workers` bucăți contigue;
// fiecare task citește lista prin `Arc`, fără lock-uri. Rezultatul este
// sortat la fel, deci nu depinde de numărul de workeri.
// ---------------------------------------------------------------------------
pub async fn find_redundant_parallel(
    lines: Arc<Vec<ScannedLine>>,
    workers: usize,
) -> Result<Vec<Redundancy>> {
    let chunk = lines.len().div_ceil(workers.max(1)).max(1);

    let mut tasks = Vec::new();
    for start in (0..lines.len()).step_by(chunk) {
        let lines = Arc::clone(&lines);
        let end = (start + chunk).min(lines.len());
        tasks.push(tokio::task::spawn_blocking(move || {
            (start..end)
                .flat_map(|index| redundancies_of(&lines, index))
                .collect::<Vec<_>>()
        }));
    }

    let mut pairs = Vec::new();
    for task in tasks {
        pairs.extend(task.await.context("Task-ul de comparare a eșuat")?);
    }
    sort_pairs(&mut pairs);
    Ok(pairs)
}

fn sort_pairs(pairs: &mut [Redundancy]) {
    pairs.sort_by_key(|p| (p.later, p.earlier));
}
