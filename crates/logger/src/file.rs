//! File sink mirroring console output

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use chrono::Local;

use crate::error::{Error, Result};
use crate::format::TIMESTAMP_FORMAT;

const QUEUE_CAPACITY: usize = 8192;
const BANNER_WIDTH: usize = 60;

enum SinkMsg {
    Line(String),
    Flush(flume::Sender<()>),
}

/// Append-only file destination fed by a bounded queue and a dedicated
/// writer thread.
///
/// Lines arrive pre-rendered; the worker strips ANSI escapes before
/// writing, so file content equals console content minus color. The
/// emit side only ever `try_send`s: a full queue drops the line rather
/// than blocking the caller.
#[derive(Debug)]
pub(crate) struct FileSink {
    path: PathBuf,
    sender: Option<flume::Sender<SinkMsg>>,
    worker: Option<JoinHandle<()>>,
}

impl FileSink {
    /// Open the file in append mode (creating parent directories),
    /// write the three-line banner, and start the writer thread.
    pub(crate) fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        write_banner(&mut file)?;

        let (sender, receiver) = flume::bounded(QUEUE_CAPACITY);
        let worker = thread::Builder::new()
            .name("opsdash-log-file".to_string())
            .spawn(move || worker_loop(&receiver, BufWriter::new(file)))?;

        Ok(Self {
            path,
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Enqueue one rendered line. Never blocks; a full queue drops the
    /// line.
    pub(crate) fn enqueue(&self, line: &str) {
        if let Some(sender) = &self.sender {
            let _ = sender.try_send(SinkMsg::Line(line.to_string()));
        }
    }

    /// Block until the worker has written everything queued so far.
    pub(crate) fn flush(&self) {
        if let Some(sender) = &self.sender {
            let (ack, done) = flume::bounded(1);
            if sender.send(SinkMsg::Flush(ack)).is_ok() {
                let _ = done.recv();
            }
        }
    }

    /// Stop the worker, draining the queue, and close the file.
    pub(crate) fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn write_banner(file: &mut File) -> std::io::Result<()> {
    let dashes = "-".repeat(BANNER_WIDTH);
    writeln!(file, "{dashes}")?;
    writeln!(file, "------ Start {}", Local::now().format(TIMESTAMP_FORMAT))?;
    writeln!(file, "{dashes}")
}

fn worker_loop(receiver: &flume::Receiver<SinkMsg>, mut writer: BufWriter<File>) {
    let mut reported = false;
    while let Ok(msg) = receiver.recv() {
        match msg {
            SinkMsg::Line(line) => {
                let stripped = strip_ansi_escapes::strip(&line);
                let result = writer
                    .write_all(&stripped)
                    .and_then(|()| writer.write_all(b"\n"));
                // Self-report once, straight to the process stderr:
                // never back through the sink.
                if let Err(e) = result
                    && !reported
                {
                    reported = true;
                    eprintln!("opsdash-logger: file sink write failed: {e}");
                }
            }
            SinkMsg::Flush(ack) => {
                let _ = writer.flush();
                let _ = ack.send(());
            }
        }
        if receiver.is_empty() {
            let _ = writer.flush();
        }
    }
    let _ = writer.flush();
}
