use aclgrep::containment::find_redundant_parallel;
use aclgrep::network::address_to_bits;
use aclgrep::parser::cisco::CiscoParser;
use aclgrep::{find_redundant, scan_rules, Config, PatternSet, Query, Scanner};

const EDGE_ACL: &str = include_str!("../demos/edge.acl");

fn grep_line_numbers(query: &Query) -> Vec<usize> {
    let parser = CiscoParser::new(PatternSet::standard());
    let mut scanner = Scanner::new(&parser);
    EDGE_ACL
        .lines()
        .map(|line| scanner.feed(line))
        .filter(|outcome| matches!(&outcome.result, Ok(rule) if aclgrep::matches(rule, query)))
        .map(|outcome| outcome.line_no)
        .collect()
}

fn ip(s: &str) -> Option<u32> {
    Some(address_to_bits(s).unwrap())
}

#[test]
fn grep_by_source_ip() {
    let query = Query { source_ip: ip("10.1.5.5"), ..Default::default() };
    assert_eq!(grep_line_numbers(&query), vec![2, 3]);
}

#[test]
fn grep_by_destination_ip_and_protocol() {
    let query = Query {
        dest_ip: ip("10.221.34.7"),
        protocol: Some("tcp".to_string()),
        ..Default::default()
    };
    assert_eq!(grep_line_numbers(&query), vec![11, 12]);
}

#[test]
fn grep_by_destination_port_and_protocol() {
    let query = Query {
        dest_port: Some(123),
        protocol: Some("udp".to_string()),
        ..Default::default()
    };
    // linia 6 are o adresă sursă invalidă, dar filtrul nu citește adrese
    assert_eq!(grep_line_numbers(&query), vec![4, 5, 6, 11, 12]);
}

#[test]
fn any_audit_lists_rules_scoped_to_any() {
    let query = Query { match_any: true, ..Default::default() };
    assert_eq!(grep_line_numbers(&query), vec![2, 3, 4, 6, 7, 9, 10]);
    assert!(grep_line_numbers(&Query::default()).is_empty());
}

#[test]
fn invalid_source_address_fails_only_source_queries() {
    let query = Query { source_ip: ip("1.1.1.5"), match_any: true, ..Default::default() };
    assert!(!grep_line_numbers(&query).contains(&6));

    let query = Query { dest_ip: ip("8.8.8.8"), match_any: true, ..Default::default() };
    assert!(grep_line_numbers(&query).contains(&6));
}

#[test]
fn acl_names_follow_the_file() {
    let parser = CiscoParser::new(PatternSet::standard());
    let rules = scan_rules(&parser, EDGE_ACL.lines());

    let names: Vec<(usize, &str)> =
        rules.iter().map(|r| (r.line_no, r.acl_name.as_str())).collect();
    assert_eq!(
        names,
        vec![
            (2, "EDGE-IN"),
            (3, "EDGE-IN"),
            (4, "EDGE-IN"),
            (5, "EDGE-IN"),
            (7, "EDGE-IN"),
            (9, "EDGE-OUT"),
            (10, "EDGE-OUT"),
            (11, "acl762"),
            (12, "acl762"),
        ]
    );
}

#[tokio::test]
async fn parallel_uniq_agrees_with_sequential() {
    let parser = CiscoParser::new(PatternSet::standard());
    let rules = scan_rules(&parser, EDGE_ACL.lines());
    let expected = find_redundant(&rules);

    let shared = std::sync::Arc::new(rules);
    for workers in [1, 2, 4, 16] {
        let pairs = find_redundant_parallel(shared.clone(), workers).await.unwrap();
        assert_eq!(pairs, expected);
    }
}

#[test]
fn uniq_reports_shadowed_rules() {
    let parser = CiscoParser::new(PatternSet::standard());
    let rules = scan_rules(&parser, EDGE_ACL.lines());

    let pairs: Vec<(usize, usize)> = find_redundant(&rules)
        .iter()
        .map(|p| (rules[p.earlier].line_no, rules[p.later].line_no))
        .collect();
    assert_eq!(pairs, vec![(2, 3), (9, 10), (11, 12)]);
}

#[test]
fn example_config_is_valid() {
    let config = Config::load("aclgrep.toml").expect("aclgrep.toml ar trebui să fie valid");
    assert_eq!(config.matching.dialect, "cisco");

    let patterns = config.pattern_set().unwrap();
    assert_eq!(patterns.resolve_port("intranet-web"), Some(8080));
    assert_eq!(patterns.resolve_port("ssh"), Some(22));
}
