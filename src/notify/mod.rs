// src/notify/mod.rs
//! Renders new postings into size-bounded messages and hands each one to a
//! delivery transport.

pub mod telegram;

use crate::error::DeliveryError;
use crate::ingest::types::JobRecord;

/// Telegram rejects messages over 4096 characters; stay well below it.
pub const DEFAULT_MESSAGE_LIMIT: usize = 4000;

/// Something that can deliver one text message.
#[async_trait::async_trait]
pub trait Deliver: Send + Sync {
    async fn deliver_chunk(&self, text: &str) -> Result<(), DeliveryError>;

    fn name(&self) -> &'static str {
        "notifier"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub chunks: usize,
    pub delivered: usize,
    pub failed: usize,
}

pub fn render_header(total: usize) -> String {
    format!("{total} new jobs found\n\n")
}

pub fn render_line(job: &JobRecord) -> String {
    format!(
        "{} в {} ({})\n\n",
        job.title, job.organization, job.identifier
    )
}

/// Splits the rendered header and lines into blocks of at most `limit`
/// characters. The header only appears in the first block. A line that would
/// overflow the current block starts a new one; a line longer than `limit` on
/// its own is cut at character boundaries. Empty input gives no blocks.
pub fn chunk_messages(jobs: &[JobRecord], limit: usize) -> Vec<String> {
    if jobs.is_empty() {
        return Vec::new();
    }
    let mut chunker = Chunker::new(limit);
    chunker.push(&render_header(jobs.len()));
    for job in jobs {
        chunker.push(&render_line(job));
    }
    chunker.finish()
}

struct Chunker {
    limit: usize,
    chunks: Vec<String>,
    buf: String,
    buf_len: usize,
}

impl Chunker {
    fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            chunks: Vec::new(),
            buf: String::new(),
            buf_len: 0,
        }
    }

    fn push(&mut self, text: &str) {
        let mut len = text.chars().count();
        if self.buf_len > 0 && self.buf_len + len > self.limit {
            self.flush();
        }
        let mut rest = text;
        // only reachable with an empty buffer
        while len > self.limit {
            let (head, tail) = split_at_char(rest, self.limit);
            self.chunks.push(head.to_string());
            rest = tail;
            len -= self.limit;
        }
        self.buf.push_str(rest);
        self.buf_len += len;
    }

    fn flush(&mut self) {
        if !self.buf.is_empty() {
            self.chunks.push(std::mem::take(&mut self.buf));
            self.buf_len = 0;
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }
}

fn split_at_char(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((idx, _)) => s.split_at(idx),
        None => (s, ""),
    }
}

/// Sends every block for `jobs` through `notifier`. A failed block is logged
/// and the remaining blocks are still attempted. No call is made for an
/// empty `jobs`.
pub async fn notify_new_jobs(
    notifier: &dyn Deliver,
    jobs: &[JobRecord],
    limit: usize,
) -> DeliveryReport {
    let chunks = chunk_messages(jobs, limit);
    let mut report = DeliveryReport {
        chunks: chunks.len(),
        ..DeliveryReport::default()
    };

    for (idx, chunk) in chunks.iter().enumerate() {
        match notifier.deliver_chunk(chunk).await {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                report.failed += 1;
                tracing::warn!(
                    notifier = notifier.name(),
                    chunk = idx + 1,
                    of = chunks.len(),
                    error = %e,
                    "delivery failed"
                );
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(n: usize) -> JobRecord {
        JobRecord::new(
            format!("https://x/{n}"),
            format!("Engineer {n}"),
            "Acme",
        )
        .unwrap()
    }

    #[test]
    fn single_block_starts_with_count() {
        let jobs = vec![job(1), job(2)];
        let chunks = chunk_messages(&jobs, DEFAULT_MESSAGE_LIMIT);
        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0],
            "2 new jobs found\n\nEngineer 1 в Acme (https://x/1)\n\nEngineer 2 в Acme (https://x/2)\n\n"
        );
    }

    #[test]
    fn empty_input_gives_no_blocks() {
        assert!(chunk_messages(&[], DEFAULT_MESSAGE_LIMIT).is_empty());
    }

    #[test]
    fn overflow_starts_new_block_without_header() {
        let jobs: Vec<_> = (0..200).map(job).collect();
        let limit = 500;
        let chunks = chunk_messages(&jobs, limit);
        assert!(chunks.len() >= 2);
        assert!(chunks.iter().all(|c| c.chars().count() <= limit));
        assert!(chunks[0].starts_with("200 new jobs found\n\n"));
        assert!(chunks[1..].iter().all(|c| !c.contains("new jobs found")));

        let header = render_header(jobs.len());
        let joined: String = chunks.concat();
        let expected: String = jobs.iter().map(render_line).collect();
        assert_eq!(&joined[header.len()..], expected);
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        let cyr = JobRecord::new("https://x/1", "Розробник", "Компанія").unwrap();
        let line = render_line(&cyr);
        let header = render_header(1);
        let exact = header.chars().count() + line.chars().count();
        assert!(header.len() + line.len() > exact);
        assert_eq!(chunk_messages(&[cyr], exact).len(), 1);
    }

    #[test]
    fn oversized_line_is_split_within_limit() {
        let long = JobRecord::new("https://x/1", "Ж".repeat(120), "Acme").unwrap();
        let limit = 50;
        let chunks = chunk_messages(std::slice::from_ref(&long), limit);
        assert!(chunks.len() >= 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= limit));
        assert_eq!(chunks.concat(), render_header(1) + &render_line(&long));
    }
}
