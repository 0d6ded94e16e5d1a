//! ## merge_te_deletions ##
//! -------------------------
//! This tool combines TE deletion calls which were made independently in
//! multiple samples into one master set. Deletion calls are made against
//! the same reference coordinates in every sample, so two calls describe
//! the same event exactly when their coordinates and TE identifier match
//! verbatim. Matching records are collapsed into one row listing all
//! supporting samples, derived from the input file names.
//!
//!
use clap::{app_from_crate,crate_name,crate_description,crate_authors,crate_version,Arg};
// our library which is within the same project
extern crate temerge;
use temerge::lib::deletions::{merge_deletion_files,write_merged_deletions};
extern crate pretty_env_logger;


fn main() {
    pretty_env_logger::init();

    let matches = app_from_crate!()
            .about("This tool merges per-sample TE deletion calls. \
            It expects tab-separated files with the columns chrom, start, end, strand and \
            the TE identifier, one file per sample. \
            The result keeps these columns and appends the comma-joined list of samples \
            sharing each deletion.")
            .arg(Arg::with_name("INPUT")
                .short("i")
                .long("input")
                .value_name("bed")
                .help("the deletion call files to merge, one per sample")
                .takes_value(true)
                .multiple(true)
                .required(true))
            .arg(Arg::with_name("OUT")
                .short("o")
                .long("output")
                .value_name("bed")
                .help("the merged output file")
                .takes_value(true)
                .required(true))
            .get_matches();

    let files : Vec<String> = matches.values_of("INPUT").unwrap().map(|x| x.to_string()).collect();
    let out   = matches.value_of("OUT");

    let master = merge_deletion_files(&files);
    write_merged_deletions(&master,out).expect("ERROR: could not write results!");
}
