//! # Trellis CLI
//!
//! Usage:
//!   trellis input.json -o layout.json
//!   echo '{ ... }' | trellis --pretty
//!   trellis --example > table.json

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use trellis::diagnostics::{LogSink, WarningSink};
use trellis::error::TableError;

/// Lay out a table document and write its page fragments as JSON.
#[derive(Debug, Parser)]
#[command(name = "trellis", version, about)]
struct Cli {
    /// Input document. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Where to write the layout. Writes to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pretty: bool,

    /// Print an example document and exit.
    #[arg(long)]
    example: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if cli.example {
        print!("{}", example_document_json());
        return;
    }

    match run(&cli) {
        Ok((fragments, warnings)) => {
            let target = cli
                .output
                .as_ref()
                .map_or_else(|| "stdout".to_string(), |p| p.display().to_string());
            eprintln!(
                "✓ Laid out {} fragment(s) with {} warning(s) to {}",
                fragments, warnings, target
            );
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<(usize, usize), TableError> {
    let input = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let result = trellis::layout_json(&input)?;
    let mut sink = LogSink;
    for warning in &result.warnings {
        sink.warn(warning.clone());
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .map_err(TableError::Output)?;

    match &cli.output {
        Some(path) => fs::write(path, json)?,
        None => println!("{}", json),
    }
    Ok((result.fragments.len(), result.warnings.len()))
}

fn example_document_json() -> &'static str {
    r##"{
  "page": {
    "size": { "Custom": { "width": 400, "height": 300 } },
    "margin": { "top": 20, "right": 20, "bottom": 20, "left": 20 }
  },
  "usedHeight": 40,
  "table": {
    "id": "invoice-lines",
    "style": {
      "width": { "Pt": 360 },
      "tableLayout": "Fixed",
      "borderSpacing": { "horizontal": 4, "vertical": 4 },
      "borderWidth": { "top": 1, "right": 1, "bottom": 1, "left": 1 }
    },
    "captions": [
      { "side": "Top", "height": 18, "id": "title" }
    ],
    "columnGroups": [
      {
        "columns": [
          { "style": { "width": { "Percent": 50 } } },
          { "style": { "width": { "Pt": 60 } } },
          {}
        ]
      }
    ],
    "rowGroups": [
      {
        "role": "Header",
        "rows": [
          {
            "cells": [
              { "content": { "type": "Block", "minWidth": 30, "maxWidth": 60, "height": 14, "baseline": 11 } },
              { "content": { "type": "Block", "minWidth": 20, "maxWidth": 24, "height": 14, "baseline": 11 } },
              { "content": { "type": "Block", "minWidth": 30, "maxWidth": 40, "height": 14, "baseline": 11 } }
            ]
          }
        ]
      },
      {
        "role": "Body",
        "rows": [
          { "cells": [ { "content": { "type": "Block", "minWidth": 40, "maxWidth": 120, "height": 48 } }, { "content": { "type": "Block", "height": 14 } }, { "content": { "type": "Block", "height": 14 } } ] },
          { "cells": [ { "content": { "type": "Block", "minWidth": 40, "maxWidth": 120, "height": 48 } }, { "content": { "type": "Block", "height": 14 } }, { "content": { "type": "Block", "height": 14 } } ] },
          { "cells": [ { "content": { "type": "Block", "minWidth": 40, "maxWidth": 120, "height": 48 } }, { "content": { "type": "Block", "height": 14 } }, { "content": { "type": "Block", "height": 14 } } ] },
          { "cells": [ { "content": { "type": "Block", "minWidth": 40, "maxWidth": 120, "height": 48 } }, { "content": { "type": "Block", "height": 14 } }, { "content": { "type": "Block", "height": 14 } } ] },
          { "cells": [ { "content": { "type": "Block", "minWidth": 40, "maxWidth": 120, "height": 48 } }, { "content": { "type": "Block", "height": 14 } }, { "content": { "type": "Block", "height": 14 } } ] }
        ]
      },
      {
        "role": "Footer",
        "rows": [
          {
            "cells": [
              { "colspan": 2, "content": { "type": "Block", "minWidth": 30, "maxWidth": 50, "height": 14 } },
              { "content": { "type": "Block", "minWidth": 30, "maxWidth": 40, "height": 14 } }
            ]
          }
        ]
      }
    ]
  }
}
"##
}
