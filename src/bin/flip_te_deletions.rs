//! ## flip_te_deletions ##
//! ------------------------
//! This tool inverts the accession lists of a merged TE deletion file.
//! Deletions are naturally reported as "these samples share the deletion
//! relative to the reference", while insertions are reported as "these
//! samples carry the insertion". To give both variant types the same
//! carrier semantic, each deletion row is rewritten to list the samples
//! which do NOT have the deletion, headed by the reference sample. The
//! strand column is dropped on the way since insertion records carry
//! none.
//!
//!
use clap::{app_from_crate,crate_name,crate_description,crate_authors,crate_version,Arg};
// our library which is within the same project
extern crate temerge;
use temerge::lib::deletions::flip_deletion_file;
extern crate pretty_env_logger;


fn main() {
    pretty_env_logger::init();

    let matches = app_from_crate!()
            .about("This tool inverts the accession lists of merged TE deletions to give a \
            consistent data format between TE insertions and deletions. \
            Every sample of the provided roster which is absent from a row's accession list \
            ends up in the inverted list, headed by the reference sample name.")
            .arg(Arg::with_name("DELETIONS")
                .short("d")
                .long("deletions")
                .value_name("bed")
                .help("the merged TE deletion file")
                .takes_value(true)
                .required(true))
            .arg(Arg::with_name("SAMPLES")
                .short("s")
                .long("samples")
                .value_name("name")
                .help("the names of all samples that went into the merge")
                .takes_value(true)
                .multiple(true)
                .required(true))
            .arg(Arg::with_name("REFERENCE")
                .short("r")
                .long("reference")
                .value_name("name")
                .help("the reference sample name, e.g. Col-0")
                .takes_value(true)
                .required(true))
            .arg(Arg::with_name("OUT")
                .short("o")
                .long("output")
                .value_name("bed")
                .help("the inverted output file")
                .takes_value(true)
                .required(true))
            .get_matches();

    let deletions = matches.value_of("DELETIONS").unwrap();
    let roster : Vec<String> = matches.values_of("SAMPLES").unwrap().map(|x| x.to_string()).collect();
    let reference = matches.value_of("REFERENCE").unwrap();
    let out       = matches.value_of("OUT");

    flip_deletion_file(deletions,&roster,reference,out).expect("ERROR: could not write results!");
}
