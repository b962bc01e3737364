//! The line-delimited JSON command loop.
//!
//! Reads one request per line, writes one response per line, and never lets
//! a command failure escape as anything but an error response. Stdout is
//! reserved for protocol output; logging goes to stderr.

use crate::context::RecallContext;
use crate::protocol::{Request, Response};
use anyhow::Result;
use recall_index::SearchEngine;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

pub struct CommandServer {
    default_db_path: PathBuf,
    context: Option<RecallContext>,
}

impl CommandServer {
    /// A server that waits for `init` before serving real commands.
    /// `default_db_path` is used when `init` names no path of its own.
    pub fn new(default_db_path: PathBuf) -> Self {
        Self {
            default_db_path,
            context: None,
        }
    }

    /// A server born initialized, for tests and embedding.
    pub fn with_context(context: RecallContext) -> Self {
        Self {
            default_db_path: context.db_path().to_path_buf(),
            context: Some(context),
        }
    }

    /// Serve requests from `reader` until EOF or `quit`.
    ///
    /// A `ready` line is written before the first read so the client knows
    /// the process came up. Unparseable lines get an error response and the
    /// loop keeps going.
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        Self::write_line(&mut writer, &Response::Ready).await?;

        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (response, quit) = match serde_json::from_str::<Request>(line) {
                Ok(request) => {
                    let quit = matches!(request, Request::Quit);
                    (self.handle(request).await, quit)
                }
                Err(e) => (Response::error(format!("invalid request: {e}")), false),
            };

            Self::write_line(&mut writer, &response).await?;
            if quit {
                break;
            }
        }

        Ok(())
    }

    /// Dispatch one request. Every arm yields a response; command failures
    /// become error responses rather than killing the loop.
    pub async fn handle(&mut self, request: Request) -> Response {
        let result = match request {
            Request::Init { db_path } => self.init(db_path).await,
            Request::IndexFile { path, force } => match self.context() {
                Ok(ctx) => ctx
                    .indexer()
                    .index_file(PathBuf::from(path).as_path(), force)
                    .await
                    .map(Response::from),
                Err(e) => Err(e),
            },
            Request::IndexDir {
                path,
                extensions,
                force,
            } => match self.context() {
                Ok(ctx) => ctx
                    .indexer()
                    .index_directory(PathBuf::from(path).as_path(), extensions.as_deref(), force)
                    .await
                    .map(Response::summary),
                Err(e) => Err(e),
            },
            Request::Search { query, limit } => match self.context() {
                Ok(ctx) => ctx
                    .search()
                    .search(&query, limit.unwrap_or(SearchEngine::DEFAULT_LIMIT))
                    .await
                    .map(Response::search),
                Err(e) => Err(e),
            },
            Request::Stats => match self.context() {
                Ok(ctx) => ctx.count().await.map(Response::count),
                Err(e) => Err(e),
            },
            Request::Clear => match self.context() {
                Ok(ctx) => ctx.clear().await.map(|()| Response::ok()),
                Err(e) => Err(e),
            },
            Request::Quit => Ok(Response::Bye),
        };

        result.unwrap_or_else(|e| Response::error(e.to_string()))
    }

    async fn init(&mut self, db_path: Option<String>) -> Result<Response> {
        let db_path = db_path
            .map(PathBuf::from)
            .unwrap_or_else(|| self.default_db_path.clone());
        tracing::info!("Initializing store at {}", db_path.display());

        let context = RecallContext::open(&db_path).await?;
        let count = context.count().await?;
        let response = Response::init(db_path.display().to_string(), count);
        self.context = Some(context);
        Ok(response)
    }

    fn context(&self) -> Result<&RecallContext> {
        self.context
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("not initialized"))
    }

    async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, response: &Response) -> Result<()> {
        let mut line = serde_json::to_vec(response)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
        Ok(())
    }
}
