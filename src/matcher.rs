// ============================================================
//  matcher.rs - Potrivirea unei reguli cu filtrul utilizatorului (grep)
// ============================================================
//
//  Ordinea evaluării (prima clauză eșuată oprește evaluarea):
//    1. IP sursă      2. IP destinație      3. protocol
//    4. port sursă    5. port destinație
//
//  O regulă cu rețea "any" se potrivește cu un IP căutat doar dacă
//  utilizatorul a cerut explicit asta (`match_any`).
//
//  Concepte Rust demonstrate aici:
//  - Enum privat (`Clause`) pentru cele trei rezultate posibile ale
//    unei clauze: trece, eșuează, sau decide direct verdictul
//  - `let ... else` pentru clauzele fără filtru
//  - Pattern matching pe `Option<&Result<T>>`: un câmp invalid contează
//    doar pentru clauza care îl evaluează
// ============================================================

use crate::error::Result;
use crate::network::NetworkSpec;
use crate::parser::AclParser;
use crate::ports::PortSpec;
use crate::rule::Rule;
use tracing::debug;

// ---------------------------------------------------------------------------
// Filtrul construit o singură dată pe rulare
//
// Fiecare câmp `None` înseamnă "nu filtra după asta". Un filtru complet
// gol este un audit "any" (vezi `matches`).
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub source_ip: Option<u32>,
    pub source_port: Option<u16>,
    pub dest_ip: Option<u32>,
    pub dest_port: Option<u16>,
    pub protocol: Option<String>,
    pub match_any: bool,
}

impl Query {
    /// Niciun filtru de adresă, port sau protocol
    pub fn is_unconstrained(&self) -> bool {
        self.source_ip.is_none()
            && self.dest_ip.is_none()
            && self.source_port.is_none()
            && self.dest_port.is_none()
            && self.protocol.is_none()
    }
}

// Rezultatul unei clauze de IP
enum Clause {
    Pass,
    Fail,
    /// regula are "any" pe partea evaluată: verdictul final este `match_any`
    Verdict(bool),
}

fn ip_clause(ip: Option<u32>, net: Option<&Result<NetworkSpec>>, match_any: bool) -> Clause {
    let Some(ip) = ip else {
        return Clause::Pass;
    };
    match net {
        Some(Ok(net)) if net.is_any() => Clause::Verdict(match_any),
        Some(Ok(net)) if net.contains_ip(ip) => Clause::Pass,
        Some(Err(err)) => {
            debug!(%err, "adresă invalidă în clauza evaluată");
            Clause::Fail
        }
        _ => Clause::Fail,
    }
}

// O clauză de port lipsă din regulă acceptă orice port
fn port_clause(port: Option<u16>, spec: Option<&Result<PortSpec>>) -> bool {
    match (port, spec) {
        (Some(port), Some(Ok(spec))) => spec.contains(port),
        (Some(_), Some(Err(err))) => {
            debug!(%err, "port invalid în clauza evaluată");
            false
        }
        _ => true,
    }
}

pub fn matches(rule: &Rule, query: &Query) -> bool {
    // Filtru gol: listăm regulile care folosesc "any", dacă s-a cerut
    if query.is_unconstrained() {
        return query.match_any && rule.touches_any();
    }

    for clause in [
        ip_clause(query.source_ip, rule.source.as_ref(), query.match_any),
        ip_clause(query.dest_ip, rule.destination.as_ref(), query.match_any),
    ] {
        match clause {
            Clause::Pass => {}
            Clause::Fail => return false,
            Clause::Verdict(verdict) => return verdict,
        }
    }

    if let Some(protocol) = query.protocol.as_deref() {
        match rule.protocol() {
            Some(p) if p == protocol || p == "ip" => {}
            _ => return false,
        }
    }

    port_clause(query.source_port, rule.source_port.as_ref())
        && port_clause(query.dest_port, rule.destination_port.as_ref())
}

/// Punctul de intrare per linie: o linie care nu e regulă nu se potrivește.
pub fn grep_line(parser: &dyn AclParser, query: &Query, line: &str) -> bool {
    match Rule::parse(parser, line) {
        Ok(rule) => matches(&rule, query),
        Err(err) => {
            debug!(%err, line, "linie ignorată");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::address_to_bits;
    use crate::parser::cisco::CiscoParser;
    use crate::parser::PatternSet;

    const ACL762: &str = "access-list acl762 line 2 extended permit ip \
                          192.168.2.0 255.255.255.0 10.221.34.0 255.255.255.0 \
                          (hitcnt=0) 0xebc9df74";

    fn grep(query: &Query, line: &str) -> bool {
        grep_line(&CiscoParser::new(PatternSet::standard()), query, line)
    }

    fn ip(s: &str) -> Option<u32> {
        Some(address_to_bits(s).unwrap())
    }

    #[test]
    fn source_ip_inside_network() {
        let query = Query { source_ip: ip("192.168.2.12"), ..Default::default() };
        assert!(grep(&query, ACL762));
        let query = Query { source_ip: ip("192.168.0.12"), ..Default::default() };
        assert!(!grep(&query, ACL762));
    }

    #[test]
    fn destination_ip_inside_network() {
        let query = Query { dest_ip: ip("10.221.34.200"), ..Default::default() };
        assert!(grep(&query, ACL762));
        let query = Query { dest_ip: ip("10.221.35.1"), ..Default::default() };
        assert!(!grep(&query, ACL762));
    }

    #[test]
    fn any_rules_need_the_opt_in() {
        let line = "access-list acl1 line 5 extended deny udp any any eq netbios-ns (hitcnt=0)";
        assert!(grep(&Query { match_any: true, ..Default::default() }, line));
        assert!(!grep(&Query::default(), line));

        let query = Query { source_ip: ip("1.2.3.4"), ..Default::default() };
        assert!(!grep(&query, line));
        let query = Query { source_ip: ip("1.2.3.4"), match_any: true, ..Default::default() };
        assert!(grep(&query, line));
    }

    #[test]
    fn any_verdict_short_circuits_later_clauses() {
        let line = "deny tcp any host 10.0.0.1 eq 22";
        let query = Query {
            source_ip: ip("1.2.3.4"),
            dest_ip: ip("10.9.9.9"),
            match_any: true,
            ..Default::default()
        };
        assert!(grep(&query, line));
    }

    #[test]
    fn missing_network_fails_an_ip_query() {
        let query = Query { source_ip: ip("10.0.0.1"), ..Default::default() };
        assert!(!grep(&query, "permit ip host 10.0.0.1"));
    }

    #[test]
    fn generic_ip_protocol_matches_every_protocol() {
        let query = |p: &str| Query { protocol: Some(p.to_string()), ..Default::default() };
        assert!(grep(&query("tcp"), ACL762));
        assert!(grep(&query("icmp"), ACL762));

        let tcp_line = "permit tcp any host 10.0.0.1 eq 443";
        assert!(grep(&query("tcp"), tcp_line));
        assert!(!grep(&query("icmp"), tcp_line));
        assert!(!grep(&query("tcp"), "access-list 132 permit gre host 1.1.1.1 host 2.2.2.2"));
    }

    #[test]
    fn port_lists() {
        let line = "permit udp 10.111.88.66 0.0.0.1 eq 88 99 123 125 10.111.34.0/14 eq 1986";
        let query = Query { source_port: Some(123), ..Default::default() };
        assert!(grep(&query, line));

        let line = "permit udp 10.111.88.66 0.0.0.1 eq 4711 10.111.34.0/14 eq 1986";
        assert!(!grep(&query, line));
    }

    #[test]
    fn destination_port_clauses() {
        let query = |p: u16| Query { dest_port: Some(p), ..Default::default() };
        let line = "permit udp 10.221.34.0/24 range 4711 2045 10.221.88.66 0.0.0.1 gt 4711 ";
        assert!(grep(&query(4712), line));
        assert!(!grep(&query(4711), line));

        let line = "permit tcp any host 10.224.6.235 eq ssh";
        assert!(grep(&query(22), line));
        assert!(!grep(&query(23), line));
    }

    #[test]
    fn absent_port_clause_accepts_any_port() {
        let query = Query { dest_port: Some(8080), ..Default::default() };
        assert!(grep(&query, ACL762));
    }

    #[test]
    fn malformed_lines_never_match() {
        let query = Query { source_ip: ip("10.0.0.1"), ..Default::default() };
        assert!(!grep(&query, "permit ip 256.0.0.0 0.0.0.255 any"));
        assert!(!grep(&query, "ip access-list extended OUTSIDE-IN"));

        let query = Query { dest_port: Some(22), ..Default::default() };
        assert!(!grep(&query, "permit tcp any host 10.0.0.1 eq nosuchservice"));
    }

    #[test]
    fn malformed_field_only_fails_the_clause_that_reads_it() {
        let line = "permit tcp 10.0.0.0 0.255.255.255 any eq citrix-xml";
        let query = Query { source_ip: ip("10.1.2.3"), ..Default::default() };
        assert!(grep(&query, line));
        let query = Query { protocol: Some("tcp".to_string()), ..Default::default() };
        assert!(grep(&query, line));
        let query = Query { dest_port: Some(2598), ..Default::default() };
        assert!(!grep(&query, line));

        let line = "permit tcp 256.0.0.0 0.0.0.255 host 10.0.0.1 eq 443";
        let query = Query { dest_ip: ip("10.0.0.1"), dest_port: Some(443), ..Default::default() };
        assert!(grep(&query, line));
    }

    #[test]
    fn acl_name_with_action_keyword_still_matches() {
        let query = Query { source_ip: ip("10.1.2.3"), ..Default::default() };
        assert!(grep(
            &query,
            "access-list deny-bogons line 1 extended permit ip 10.0.0.0 255.0.0.0 any"
        ));
        assert!(grep(
            &query,
            "access-list permit-web line 2 extended deny ip 10.0.0.0 255.0.0.0 any"
        ));
    }

    #[test]
    fn malformed_mask_never_matches() {
        let query = Query { source_ip: ip("165.34.0.1"), ..Default::default() };
        assert!(!grep(&query, "permit ip 165.34.0.0 155.155.0.0 10.111.34.0 0.0.0.255"));
    }
}
