// ============================================================
//  parser/cisco.rs - Parser pentru dump-uri ACL Cisco (IOS / ASA)
// ============================================================
//
//  Formate de linie exemplu:
//  access-list acl762 line 2 extended permit ip 165.34.0.0 255.255.0.0
//      10.221.34.0 255.255.255.0 (hitcnt=0) 0xebc9df74
//  permit udp 10.221.88.66 0.0.0.1 eq 4711 host 224.0.0.2 eq 4711
//  40 deny icmp any 10.111.114.0/32
//  ip access-list extended OUTSIDE-IN
//
//  Câmpuri extrase:
//    - acțiunea (permit / deny), protocolul, flag-ul "established"
//    - rețeaua și portul sursă / destinație
//    - numele ACL-ului (liniile "ip access-list ..." și "access-list <nume> ...")
//
//  Concepte Rust demonstrate aici:
//  - Implementarea unui trait (`AclParser`) pentru un struct concret
//  - `Cow<str>`: linia se copiază doar dacă a conținut nume de servicii
//  - `Arc<PatternSet>`: același set de regex-uri partajat între parsere
// ============================================================

use super::{
    assign_source_dest, match_patterns, promote_host, single_hit, AclParser, ExtractedFields,
    FieldKind, PatternSet, RuleAction,
};
use std::sync::Arc;
use tracing::trace;

pub struct CiscoParser {
    patterns: Arc<PatternSet>,
}

impl CiscoParser {
    pub fn new(patterns: Arc<PatternSet>) -> Self {
        CiscoParser { patterns }
    }

    fn acl_name(&self, line: &str) -> Option<String> {
        self.patterns
            .acl_name
            .iter()
            .find_map(|p| p.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

impl AclParser for CiscoParser {
    fn name(&self) -> &str {
        "Cisco IOS/ASA"
    }

    fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    fn extract(&self, line: &str) -> ExtractedFields {
        let line = line.trim_end_matches(['\r', '\n']);
        let acl_name = self.acl_name(line);

        // Numele de servicii devin numere înainte de orice altă căutare
        let line = self.patterns.substitute_services(line);
        let line = line.as_ref();
        let tail = self.patterns.port_tail_window;

        let action = single_hit(&match_patterns(line, &self.patterns.action))
            .as_deref()
            .and_then(RuleAction::from_keyword);
        let protocol = single_hit(&match_patterns(line, &self.patterns.protocol));
        let extra = single_hit(&match_patterns(line, &self.patterns.extra));

        // O linie fără protocol este un ACL standard: singura rețea este sursa
        let hits = match_patterns(line, &self.patterns.net);
        let (source_net, dest_net) =
            assign_source_dest(&hits, line, FieldKind::Network, tail, protocol.is_none());

        let hits = match_patterns(line, &self.patterns.port);
        let (source_port, dest_port) =
            assign_source_dest(&hits, line, FieldKind::Port, tail, false);

        let fields = ExtractedFields {
            action,
            source_net: promote_host(source_net),
            dest_net: promote_host(dest_net),
            source_port,
            dest_port,
            protocol,
            extra,
            acl_name,
        };
        trace!(?fields, "câmpuri extrase");
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(line: &str) -> ExtractedFields {
        CiscoParser::new(PatternSet::standard()).extract(line)
    }

    fn nets(line: &str) -> (Option<String>, Option<String>) {
        let f = extract(line);
        (f.source_net, f.dest_net)
    }

    fn ports(line: &str) -> (Option<String>, Option<String>) {
        let f = extract(line);
        (f.source_port, f.dest_port)
    }

    fn pair(a: &str, b: &str) -> (Option<String>, Option<String>) {
        (Some(a.to_string()), Some(b.to_string()))
    }

    #[test]
    fn source_and_dest_net() {
        assert_eq!(
            nets(
                "access-list acl762 line 2 extended permit ip 165.34.0.0 255.255.0.0 \
                 10.221.34.0 255.255.255.0 (hitcnt=0) 0xebc9df74"
            ),
            pair("165.34.0.0 255.255.0.0", "10.221.34.0 255.255.255.0")
        );
        assert_eq!(
            nets(
                "access-list acl762 line 2 extended permit ip 165.34.0.0/16 10.221.34.0/24 \
                 (hitcnt=0) 0xebc9df74"
            ),
            pair("165.34.0.0/16", "10.221.34.0/24")
        );
        assert_eq!(
            nets("permit udp 10.221.88.66 0.0.0.1 eq 4711 host 224.0.0.2 eq 4711"),
            pair("10.221.88.66 0.0.0.1", "224.0.0.2/32")
        );
    }

    #[test]
    fn mixed_net_forms() {
        assert_eq!(
            nets("permit udp 10.221.88.66 0.0.0.1 eq 4711 10.221.34.0/24 eq 4711"),
            pair("10.221.88.66 0.0.0.1", "10.221.34.0/24")
        );
        assert_eq!(
            nets("permit udp 10.221.34.0/24 eq 4711 10.221.88.66 0.0.0.1 eq 4711 "),
            pair("10.221.34.0/24", "10.221.88.66 0.0.0.1")
        );
        assert_eq!(
            nets("access-list 132 permit gre host 195.143.113.118 host 111.168.171.55"),
            pair("195.143.113.118/32", "111.168.171.55/32")
        );
    }

    #[test]
    fn any_nets() {
        assert_eq!(nets("50 deny ip any 10.221.224.127/32"), pair("any", "10.221.224.127/32"));
        assert_eq!(
            nets("50 deny ip 10.221.224.0/0.0.0.255 any"),
            pair("10.221.224.0/0.0.0.255", "any")
        );
    }

    #[test]
    fn source_and_dest_port() {
        assert_eq!(
            ports("permit udp 10.221.88.66 0.0.0.1 eq 4711 10.221.34.0/24 eq 1986"),
            pair("eq 4711", "eq 1986")
        );
        assert_eq!(
            ports("permit udp 10.111.88.66 0.0.0.1 eq 198 945 10.111.34.0/14 eq 1986 6789 11103"),
            pair("eq 198 945", "eq 1986 6789 11103")
        );
        assert_eq!(
            ports("permit udp 10.221.34.0/24 range 4711 2045 10.221.88.66 0.0.0.1 gt 4711 "),
            pair("range 4711 2045", "gt 4711")
        );
    }

    #[test]
    fn any_ports_and_service_names() {
        assert_eq!(
            ports("access-list acl762 line 3 extended permit tcp any host 10.224.6.235 eq ssh"),
            pair("any", "eq 22")
        );
        assert_eq!(
            ports("50 deny udp 10.221.224.0/0.0.0.255 neq 1035 any"),
            pair("neq 1035", "any")
        );
    }

    #[test]
    fn protocol_action_and_flags() {
        let f = extract("permit udp 10.221.88.66 0.0.0.1 eq 4711 host 224.0.0.2 eq 4711");
        assert_eq!(f.protocol.as_deref(), Some("udp"));
        assert_eq!(f.action, Some(RuleAction::Permit));

        let f = extract("40 deny icmp any 10.111.114.0/32");
        assert_eq!(f.protocol.as_deref(), Some("icmp"));
        assert_eq!(f.action, Some(RuleAction::Deny));

        assert_eq!(extract("40 deny ip any 10.111.114.0/32").protocol.as_deref(), Some("ip"));
        assert_eq!(extract("access-list 132 permit gre host 1.1.1.1 host 2.2.2.2").protocol, None);

        // acțiunea se citește doar din poziția ei, nu din numele ACL-ului
        let action = |line: &str| extract(line).action;
        assert_eq!(
            action("access-list deny-bogons line 1 extended permit ip 10.0.0.0 255.0.0.0 any"),
            Some(RuleAction::Permit)
        );
        let standard = "access-list permit-all deny 10.0.0.0 0.0.0.255";
        assert_eq!(action(standard), Some(RuleAction::Deny));
        assert_eq!(action("access-list 10 remark deny guests"), None);
        assert_eq!(action("ip access-list extended deny-list"), None);

        let f = extract("permit tcp 10.0.0.0/8 eq 80 any established");
        assert_eq!(f.extra.as_deref(), Some("established"));
        assert_eq!((f.source_port, f.dest_port), pair("eq 80", "any"));
    }

    #[test]
    fn acl_names() {
        let name = |line: &str| extract(line).acl_name;
        assert_eq!(name("ip access-list extended OUTSIDE-IN").as_deref(), Some("OUTSIDE-IN"));
        assert_eq!(extract("ip access-list standard MGMT").acl_name.as_deref(), Some("MGMT"));
        assert_eq!(extract("ip access-list VTY").acl_name.as_deref(), Some("VTY"));
        assert_eq!(
            extract("access-list acl762 line 2 extended permit ip any any").acl_name.as_deref(),
            Some("acl762")
        );
        assert_eq!(extract(" 10 permit ip any any").acl_name, None);
        // numele ACL-ului nu trece prin tabela de servicii
        assert_eq!(extract("ip access-list extended www").acl_name.as_deref(), Some("www"));
    }

    #[test]
    fn standard_acl_single_net_is_source() {
        let f = extract("access-list 10 permit 10.0.0.0 0.0.0.255");
        assert_eq!(f.source_net.as_deref(), Some("10.0.0.0 0.0.0.255"));
        assert_eq!(f.dest_net, None);

        let f = extract("permit ip host 10.0.0.1");
        assert_eq!((f.source_net, f.dest_net), (None, None));
    }

    #[test]
    fn trailing_newline_is_ignored() {
        let f = extract("permit tcp any host 10.0.0.1 eq 443\r\n");
        assert_eq!(f.dest_port.as_deref(), Some("eq 443"));
    }

    #[test]
    fn garbage_yields_empty_fields() {
        assert_eq!(extract(""), ExtractedFields::default());
        assert_eq!(extract("! remark only"), ExtractedFields::default());
    }
}
