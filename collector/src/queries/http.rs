/// Cache status breakdown plus the per-minute request totals of one zone.
pub const DOCUMENT: &str = r#"
query ($zoneTag: string, $startDate: Time, $endDate: Time) {
  viewer {
    zones(filter: { zoneTag: $zoneTag }) {
      caching: httpRequestsCacheGroups(
        limit: 10000
        filter: { datetimeMinute_geq: $startDate, datetimeMinute_leq: $endDate }
      ) {
        dimensions {
          cacheStatus
          clientCountryName
          clientRequestHTTPMethodName
          edgeResponseContentTypeName
        }
        sumEdgeResponseBytes: sum {
          edgeResponseBytes
        }
      }
      requests: httpRequests1mGroups(
        limit: 10000
        filter: { datetimeMinute_geq: $startDate, datetimeMinute_leq: $endDate }
      ) {
        requestsData: sum {
          bytes
          cachedBytes
          requests
          cachedRequests
          encryptedBytes
          encryptedRequests
          clientSSLMap {
            requests
            clientSSLProtocol
          }
          responseStatusMap {
            edgeResponseStatus
            requests
          }
          clientHTTPVersionMap {
            requests
            clientHTTPProtocol
          }
          contentTypeMap {
            requests
            bytes
            edgeResponseContentTypeName
          }
          countryMap {
            requests
            threats
            clientCountryName
            bytes
          }
        }
      }
    }
  }
}
"#;
