use crate::data::LookupResult;
use crate::Result;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::Receiver;
use tracing::{debug, info};

/// Writes every result to `out` as a single line of JSON as soon as it arrives. Returns the
/// number of records written.
pub async fn print_results<W: AsyncWrite + Unpin>(
    mut receiver: Receiver<LookupResult>,
    out: &mut W,
) -> Result<usize> {
    let mut count = 0;
    let mut errors = 0;
    while let Some(result) = receiver.recv().await {
        if result.is_error() {
            debug!("{} lookup for {} failed", result.kind(), result.host());
            errors += 1;
        }
        let line = match &result {
            LookupResult::Whois(report) => serde_json::to_string(report)?,
            LookupResult::Dns(report) => serde_json::to_string(report)?,
        };
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
        count += 1;
    }
    info!("printed {} records, {} of them errors", count, errors);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DnsOutcome, DnsReport, RecordKind, WhoisOutcome, WhoisReport};
    use tokio::sync::mpsc::channel;

    #[tokio::test]
    async fn prints_one_line_per_result_without_variant_tag() {
        let (tx, rx) = channel(4);
        tx.send(LookupResult::Whois(WhoisReport {
            host: "example.com".into(),
            domain: "example.com".into(),
            outcome: WhoisOutcome::Error {
                error: "timed out".into(),
            },
        }))
        .await
        .unwrap();
        tx.send(LookupResult::Dns(DnsReport {
            host: "example.com".into(),
            kind: RecordKind::A,
            outcome: DnsOutcome::Data { data: vec![] },
        }))
        .await
        .unwrap();
        drop(tx);

        let mut out = Vec::new();
        let count = print_results(rx, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            text,
            "{\"host\":\"example.com\",\"domain\":\"example.com\",\"error\":\"timed out\"}\n\
             {\"host\":\"example.com\",\"type\":\"A\",\"data\":[]}\n"
        );
    }

    #[tokio::test]
    async fn slow_reader_does_not_stall_the_runtime() {
        // A pipe with room for only a few bytes: every write has to wait for the reader task,
        // which shares this single-threaded runtime.
        let (mut writer, mut reader) = tokio::io::duplex(8);
        let reading = tokio::spawn(async move {
            let mut text = String::new();
            tokio::io::AsyncReadExt::read_to_string(&mut reader, &mut text)
                .await
                .unwrap();
            text
        });

        let (tx, rx) = channel(4);
        for kind in RecordKind::ALL {
            tx.send(LookupResult::Dns(DnsReport {
                host: "example.com".into(),
                kind,
                outcome: DnsOutcome::Data { data: vec![] },
            }))
            .await
            .unwrap();
        }
        drop(tx);

        assert_eq!(print_results(rx, &mut writer).await.unwrap(), 3);
        drop(writer);
        let text = reading.await.unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(1).unwrap().contains("\"AAAA\""));
    }

    #[tokio::test]
    async fn closed_channel_prints_nothing() {
        let (tx, rx) = channel(1);
        drop(tx);
        let mut out = Vec::new();
        assert_eq!(print_results(rx, &mut out).await.unwrap(), 0);
        assert!(out.is_empty());
    }
}
