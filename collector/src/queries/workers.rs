/// Invocation statistics of every worker script in one account.
pub const DOCUMENT: &str = r#"
query ($accountTag: string, $startDate: Time, $endDate: Time) {
  viewer {
    accounts(filter: { accountTag: $accountTag }) {
      workers: workersInvocationsAdaptive(
        limit: 10000
        filter: { datetimeHour_geq: $startDate, datetimeHour_leq: $endDate }
      ) {
        sum {
          subrequests
          requests
          errors
        }
        quantiles {
          cpuTimeP50
          cpuTimeP75
          cpuTimeP99
          cpuTimeP999
        }
        info: dimensions {
          scriptName
        }
      }
    }
  }
}
"#;
