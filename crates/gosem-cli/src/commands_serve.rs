//! `gosem serve`: newline-delimited request/response loop over stdio, or
//! one session per TCP connection on a localhost port.

use crate::protocol::{Request, Response};
use gosem_core::GosemConfig;
use gosem_index::{find_tokenizer, tokenizers_with_catalog, Catalog, SemanticTokenizer};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Port the highlight server listens on by default.
pub(crate) const DEFAULT_PORT: u16 = 53827;
const LISTEN_ADDRESS: &str = "127.0.0.1";
/// Tokenizing recurses once per nesting level of the parsed buffer.
const WORKER_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Dispatches requests to the tokenizer registered for their buffer type.
pub(crate) struct TokenizeHandler {
    tokenizers: Vec<Box<dyn SemanticTokenizer>>,
}

impl TokenizeHandler {
    pub(crate) fn new(catalog: Catalog) -> Self {
        Self {
            tokenizers: tokenizers_with_catalog(catalog),
        }
    }

    /// Produce the response for one request line.
    pub(crate) fn handle_line(&self, line: &str) -> Response {
        let request = match Request::parse(line) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!("deserialization error: {e}");
                return Response::invalid_request(&e);
            }
        };

        let Some(tokenizer) = find_tokenizer(&self.tokenizers, &request.buf_type) else {
            tracing::error!(
                "couldn't get tokenizer for buffer type: {}",
                request.buf_type
            );
            let message = format!(
                "couldn't get tokenizer for buffer type: {}",
                request.buf_type
            );
            return Response::failure(&request, message);
        };

        if !request.additional_info.is_empty() {
            tracing::debug!(
                "Ignoring additional_info for {}: {}",
                request.buf_name,
                request.additional_info
            );
        }

        match tokenizer.tokenize(&request.buf_name, &request.buf_body) {
            Ok(output) => {
                let warning = output.resolution_error().map(|e| e.to_string());
                Response::success(&request, output.table, warning)
            }
            Err(e) => Response::failure(&request, e.to_string()),
        }
    }

    /// Serve until stdin is closed.
    pub(crate) fn run(&self, input: impl BufRead, output: &mut impl Write) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let response = self.handle_line(&line);
            write_response(output, &response)?;
        }
        Ok(())
    }
}

pub(crate) fn cmd_serve(config: &GosemConfig, port: Option<u16>) -> anyhow::Result<()> {
    let catalog = Catalog::from_config(&config.catalog)?;
    let packages = catalog.len();
    let handler = TokenizeHandler::new(catalog);

    let Some(port) = port else {
        tracing::info!("Serving tokenize requests on stdio ({packages} catalog packages)");
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut stdout = stdout.lock();
        return handler.run(stdin.lock(), &mut stdout);
    };

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_stack_size(WORKER_STACK_SIZE)
        .build()?;
    rt.block_on(async {
        let listener = TcpListener::bind((LISTEN_ADDRESS, port)).await?;
        tracing::info!(
            "Serving tokenize requests on {} ({packages} catalog packages)",
            listener.local_addr()?
        );
        accept_loop(listener, Arc::new(handler)).await
    })
}

/// Accept connections forever, one task per connection.
async fn accept_loop(listener: TcpListener, handler: Arc<TokenizeHandler>) -> anyhow::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        tracing::info!("accepted connection from {peer}");
        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            match serve_connection(handler, stream).await {
                Ok(()) => tracing::info!("closed connection from {peer}"),
                Err(e) => tracing::error!("connection error from {peer}: {e}"),
            }
        });
    }
}

/// One session: answer each request line until the peer closes.
async fn serve_connection(handler: Arc<TokenizeHandler>, stream: TcpStream) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let handler = Arc::clone(&handler);
        let response = tokio::task::spawn_blocking(move || handler.handle_line(&line)).await?;
        let mut out = response.to_line()?;
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

fn write_response(writer: &mut impl Write, response: &Response) -> anyhow::Result<()> {
    let line = response.to_line()?;
    writeln!(writer, "{line}")?;
    writer.flush()?;
    Ok(())
}
