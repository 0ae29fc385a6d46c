use abiml_driver::{
    Conf, DirArchive, read_corpus_document_from_file, read_corpus_from_archive,
    read_unit_from_file,
};
use abiml_ir::TranslationUnit;
use clap::Parser;

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<(), String> {
    env_logger::init();
    match Cli::parse().command {
        | Commands::Unit { file } => {
            let tu = read_unit_from_file(&file).map_err(|err| err.to_string())?;
            print_unit(&tu);
        }
        | Commands::Corpus { file } => {
            let corpus = read_corpus_document_from_file(&file).map_err(|err| err.to_string())?;
            println!("{}: {} unit(s)", corpus.path, corpus.units.len());
            for tu in &corpus.units {
                print_unit(tu);
            }
        }
        | Commands::Archive { dir, conf, strict } => {
            let mut conf = match conf {
                | Some(path) => Conf::load(path).map_err(|err| err.to_string())?,
                | None => Conf::default(),
            };
            if strict {
                conf.strict = true;
            }
            let archive = DirArchive::open(&dir, &conf);
            let (corpus, read) =
                read_corpus_from_archive(&archive, dir.display().to_string(), &conf)
                    .map_err(|err| err.to_string())?;
            println!("{}: {} entries read", corpus.path, read);
            for tu in &corpus.units {
                print_unit(tu);
            }
        }
    }
    Ok(())
}

fn print_unit(tu: &TranslationUnit) {
    match tu.address_size {
        | Some(bits) => {
            println!("  {}: {} node(s), address size {} bits", tu.path, tu.len(), bits)
        }
        | None => println!("  {}: {} node(s)", tu.path, tu.len()),
    }
}
