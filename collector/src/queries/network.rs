/// Attack traffic seen by the network analytics of one account, heaviest first.
pub const DOCUMENT: &str = r#"
query ($accountTag: string, $startDate: Time, $endDate: Time) {
  viewer {
    accounts(filter: { accountTag: $accountTag }) {
      attackHistory: ipFlows1mGroups(
        limit: 10000
        filter: { datetimeMinute_geq: $startDate, datetimeMinute_leq: $endDate }
        orderBy: [sum_packets_DESC]
      ) {
        sum {
          bits
          packets
        }
        networkDimensions: dimensions {
          attackId
          coloCountry
          destinationPort
          attackType
          attackMitigationType
          attackProtocol
        }
      }
    }
  }
}
"#;
