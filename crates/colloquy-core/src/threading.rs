//! Thread reconstruction from a flat exchange log.
//!
//! Groups exchanges by `thread_id` and ranks the groups by recency. The
//! output is deterministic even when timestamps collide: within a thread,
//! equal timestamps keep insertion order (stable sort); across threads,
//! equal last-activity timestamps order by lexical `thread_id`.

use std::collections::HashMap;

use colloquy_types::exchange::{Exchange, Thread};

/// Group `exchanges` (in original insertion order) into threads and return
/// the `limit` most-recently-active ones, most recent thread first.
///
/// Within each thread, exchanges are sorted by timestamp ascending; ties
/// keep insertion order. A thread's site is taken from its first exchange.
pub fn group_into_threads(exchanges: Vec<Exchange>, limit: usize) -> Vec<Thread> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Thread> = HashMap::new();

    for exchange in exchanges {
        let group = groups
            .entry(exchange.thread_id.clone())
            .or_insert_with(|| {
                order.push(exchange.thread_id.clone());
                Thread {
                    thread_id: exchange.thread_id.clone(),
                    site: exchange.site.clone(),
                    exchanges: Vec::new(),
                }
            });
        group.exchanges.push(exchange);
    }

    // Drain in first-seen order so the later recency sort is stable across
    // runs regardless of hash iteration order.
    let mut threads: Vec<Thread> = order
        .into_iter()
        .filter_map(|thread_id| groups.remove(&thread_id))
        .collect();

    for thread in &mut threads {
        // Stable: equal timestamps keep insertion order.
        thread.exchanges.sort_by_key(|e| e.timestamp);
    }

    threads.sort_by(|a, b| {
        b.last_active()
            .cmp(&a.last_active())
            .then_with(|| a.thread_id.cmp(&b.thread_id))
    });
    threads.truncate(limit);
    threads
}
