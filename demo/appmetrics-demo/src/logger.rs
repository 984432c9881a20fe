/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::cell::RefCell;
use std::fmt::{Arguments, Write as _};
use std::io::{self, Write};
use std::thread::JoinHandle;

use chrono::Local;
use flume::{Receiver, Sender};
use slog::{Drain, Level, Never, OwnedKVList, Record, Serializer, KV, slog_o};
use slog_scope::GlobalLoggerGuard;

const CHANNEL_CAPACITY: usize = 4096;

thread_local! {
    static TL_BUF: RefCell<String> = RefCell::new(String::with_capacity(128));
}

struct LogValue {
    level: Level,
    message: String,
    kv_pairs: Vec<(String, String)>,
}

struct KvCollector<'a>(&'a mut Vec<(String, String)>);

impl Serializer for KvCollector<'_> {
    fn emit_arguments(&mut self, key: slog::Key, value: &Arguments) -> slog::Result {
        let v = match value.as_str() {
            Some(s) => s.to_string(),
            None => TL_BUF.with(|buf| {
                let mut buf = buf.borrow_mut();
                buf.clear();
                let _ = buf.write_fmt(*value);
                buf.clone()
            }),
        };
        self.0.push((key.to_string(), v));
        Ok(())
    }
}

struct StderrDrain {
    sender: Sender<LogValue>,
}

impl Drain for StderrDrain {
    type Ok = ();
    type Err = Never;

    fn log(&self, record: &Record, values: &OwnedKVList) -> Result<(), Never> {
        let mut kv_pairs = Vec::new();
        let mut collector = KvCollector(&mut kv_pairs);
        let _ = values.serialize(record, &mut collector);
        let _ = record.kv().serialize(record, &mut collector);

        let v = LogValue {
            level: record.level(),
            message: record.msg().to_string(),
            kv_pairs,
        };
        // drop the record if the io thread is lagging behind
        let _ = self.sender.try_send(v);
        Ok(())
    }
}

struct IoThread {
    receiver: Receiver<LogValue>,
}

impl IoThread {
    fn run(self) {
        let mut stderr = io::stderr();
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        while let Ok(v) = self.receiver.recv() {
            buf.clear();
            let _ = Self::write_plain(&mut buf, v);
            while let Ok(v) = self.receiver.try_recv() {
                let _ = Self::write_plain(&mut buf, v);
            }
            let _ = stderr.write_all(&buf);
            let _ = stderr.flush();
        }
    }

    fn write_plain(io: &mut Vec<u8>, v: LogValue) -> io::Result<()> {
        let datetime = Local::now();
        write!(io, "{}", datetime.format("%Y-%m-%d %H:%M:%S%.6f"))?;
        write!(io, " {}", v.level.as_short_str())?;
        for (k, v) in &v.kv_pairs {
            write!(io, " {k}: {v},")?;
        }
        if v.message.is_empty() {
            writeln!(io, " ()")
        } else {
            writeln!(io, " {}", v.message)
        }
    }
}

/// Keeps the global logger alive, and drains pending records on drop.
pub(crate) struct LoggerGuard {
    scope_guard: Option<GlobalLoggerGuard>,
    io_thread: Option<JoinHandle<()>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        // dropping the scope guard releases the last sender
        self.scope_guard.take();
        if let Some(handle) = self.io_thread.take() {
            let _ = handle.join();
        }
    }
}

pub(crate) fn setup(verbose: bool) -> anyhow::Result<LoggerGuard> {
    let (sender, receiver) = flume::bounded::<LogValue>(CHANNEL_CAPACITY);
    let io_thread = std::thread::Builder::new()
        .name("log-io".to_string())
        .spawn(move || IoThread { receiver }.run())?;

    let drain = StderrDrain { sender };
    let logger = slog::Logger::root(drain.fuse(), slog_o!());
    let scope_guard = slog_scope::set_global_logger(logger);

    let level = if verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    slog_stdlog::init_with_level(level)
        .map_err(|e| anyhow::anyhow!("failed to setup std log: {e}"))?;

    Ok(LoggerGuard {
        scope_guard: Some(scope_guard),
        io_thread: Some(io_thread),
    })
}
