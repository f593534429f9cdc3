//! Property tests for the mapping-string parsers.

use proptest::prelude::*;

use unmanaged_cluster::{parse_install_package_mappings, parse_port_mapping};

fn protocol_any_case() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[tT][cC][pP]|[uU][dD][pP]|[sS][cC][tT][pP]").unwrap()
}

fn package_segment() -> impl Strategy<Value = String> {
    // Segments may not contain the two delimiters
    proptest::string::string_regex("[A-Za-z0-9._/-]{1,20}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `parse_port_mapping` never panics on arbitrary input.
    #[test]
    fn property_parse_port_mapping_never_panics(
        mapping in "(?s).{0,64}"
    ) {
        let _ = parse_port_mapping(&mapping);
    }

    /// PROPERTY: Any container/host port pair renders and parses back.
    #[test]
    fn property_port_pair_round_trips(
        container in 0u16..,
        host in 0u16..,
    ) {
        let parsed = parse_port_mapping(&format!("{container}:{host}"))
            .expect("expected numeric port pair to parse");

        prop_assert_eq!(parsed.container_port, container);
        prop_assert_eq!(parsed.host_port, host);
        prop_assert_eq!(parsed.listen_address, None);
        prop_assert_eq!(parsed.protocol, None);
    }

    /// PROPERTY: A known protocol suffix is accepted regardless of case.
    #[test]
    fn property_protocol_case_insensitive(
        container in 0u16..,
        protocol in protocol_any_case(),
    ) {
        let parsed = parse_port_mapping(&format!("{container}/{protocol}"))
            .expect("expected known protocol to parse");

        prop_assert_eq!(
            parsed.protocol.expect("protocol set").as_str(),
            protocol.to_lowercase()
        );
    }

    /// PROPERTY: `parse_install_package_mappings` never panics.
    #[test]
    fn property_parse_install_packages_never_panics(
        raw in proptest::collection::vec("(?s).{0,48}", 0..=4)
    ) {
        let _ = parse_install_package_mappings(&raw);
    }

    /// PROPERTY: Delimiter-free segments reassemble into their fields.
    #[test]
    fn property_install_package_segments_round_trip(
        segments in proptest::collection::vec(package_segment(), 1..=4)
    ) {
        let mapping = segments.join(":");
        let parsed = parse_install_package_mappings(&[mapping])
            .expect("expected well-formed mapping to parse");

        let empty = String::new();
        prop_assert_eq!(parsed.len(), 1);
        prop_assert_eq!(&parsed[0].name, &segments[0]);
        prop_assert_eq!(&parsed[0].version, segments.get(1).unwrap_or(&empty));
        prop_assert_eq!(&parsed[0].config, segments.get(2).unwrap_or(&empty));
        prop_assert_eq!(&parsed[0].namespace, segments.get(3).unwrap_or(&empty));
    }

    /// PROPERTY: Comma-joined mappings flatten to one record apiece.
    #[test]
    fn property_comma_joined_mappings_flatten(
        names in proptest::collection::vec(package_segment(), 1..=6)
    ) {
        let parsed = parse_install_package_mappings(&[names.join(",")])
            .expect("expected comma-joined names to parse");

        prop_assert_eq!(parsed.len(), names.len());
        for (record, name) in parsed.iter().zip(&names) {
            prop_assert_eq!(&record.name, name);
        }
    }
}
