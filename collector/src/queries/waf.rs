pub const DOCUMENT: &str = r#"
query ($zoneTag: string, $startDate: Time, $endDate: Time) {
  viewer {
    zones(filter: { zoneTag: $zoneTag }) {
      fwEvents: firewallEventsAdaptiveGroups(
        limit: 5000
        filter: { datetimeMinute_geq: $startDate, datetimeMinute_leq: $endDate }
      ) {
        count
        dimensions {
          action
          clientCountryName
          clientASNDescription
          ruleId
        }
      }
    }
  }
}
"#;
