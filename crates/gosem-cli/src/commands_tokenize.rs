//! `gosem tokenize`: one buffer in, one line of JSON out.

use gosem_core::GosemConfig;
use gosem_index::{decode_source, Catalog, GoTokenizer, SemanticTokenizer};
use std::io::Read;
use std::path::Path;

/// Virtual file name used for positions when reading stdin.
pub(crate) const STDIN_FILE_NAME: &str = "stdin.go";

pub(crate) fn cmd_tokenize(file: Option<&Path>, config: &GosemConfig) -> anyhow::Result<()> {
    let (name, bytes) = match file {
        Some(path) => (path.display().to_string(), std::fs::read(path)?),
        None => {
            let mut bytes = Vec::new();
            std::io::stdin().lock().read_to_end(&mut bytes)?;
            (STDIN_FILE_NAME.to_string(), bytes)
        }
    };
    let source = decode_source(&name, &bytes)?;

    let tokenizer = GoTokenizer::with_catalog(Catalog::from_config(&config.catalog)?);
    let output = tokenizer.tokenize(&name, source)?;

    println!("{}", output.table.to_json()?);
    Ok(())
}
