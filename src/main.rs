// SPDX-License-Identifier: MIT

use anyhow::Context;
use clap::{Parser, Subcommand};
use supernodes::tree::display_value;
use supernodes::{Bindings, TreeLoader};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a tree as ASCII art
    Render {
        /// Path to the tree file (YAML, or JSON with a .json extension)
        #[arg(short, long)]
        file: String,
    },
    /// Route through a decision tree and print where it stops
    Route {
        /// Path to the tree file
        #[arg(short, long)]
        file: String,

        /// Variable bindings as a JSON object, e.g. '{"x": [2, 0]}'
        #[arg(short, long, default_value = "{}")]
        vars: String,
    },
    /// List every root-to-leaf path
    Paths {
        /// Path to the tree file
        #[arg(short, long)]
        file: String,

        /// Node field or attribute to print for each node
        #[arg(short, long, default_value = "name")]
        attribute: String,
    },
    /// Convert a tree file between YAML and JSON
    Convert {
        /// Path to the tree file
        #[arg(short, long)]
        file: String,

        /// Emit JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let loader = TreeLoader::new();

    match args.command {
        Commands::Render { file } => {
            let tree = loader.load(&file).with_context(|| format!("loading {}", file))?;
            println!("{}", tree);
        }
        Commands::Route { file, vars } => {
            let tree = loader.load(&file).with_context(|| format!("loading {}", file))?;
            let parsed: serde_json::Value =
                serde_json::from_str(&vars).context("parsing --vars")?;
            let bindings = Bindings::from_json(parsed)
                .ok_or_else(|| anyhow::anyhow!("--vars must be a JSON object"))?;

            log::info!("Routing {} with {} binding(s)", file, bindings.len());
            let leaf = tree.route(&bindings)?;
            println!("{}", leaf.summary());
            println!("{}", serde_json::to_string_pretty(&leaf.value)?);
        }
        Commands::Paths { file, attribute } => {
            let tree = loader.load(&file).with_context(|| format!("loading {}", file))?;
            for path in tree.to_attribute_path_list(&attribute) {
                let parts: Vec<String> = path.iter().map(display_value).collect();
                println!("{}", parts.join(" -> "));
            }
        }
        Commands::Convert { file, json } => {
            let tree = loader.load(&file).with_context(|| format!("loading {}", file))?;
            let text = if json {
                TreeLoader::to_json(&tree)?
            } else {
                TreeLoader::to_yaml(&tree)?
            };
            print!("{}", text);
            if json {
                println!();
            }
        }
    }

    Ok(())
}
