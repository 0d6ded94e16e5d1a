//! ## merge_te_insertions ##
//! --------------------------
//! This tool combines TE insertion calls which were made independently in
//! multiple samples into one non-redundant call set. Candidates of all
//! samples are grouped by coordinate proximity and within each group the
//! calls which describe the same event (shared TE identity, overlapping
//! insertion site, same donor locus) are collapsed into one record that
//! lists all supporting samples.
//! The sample identifier of each call is derived from its file name.
//!
//!
use clap::{app_from_crate,crate_name,crate_description,crate_authors,crate_version,Arg};
// our library which is within the same project
extern crate temerge;
use temerge::lib::common::MERGE_DISTANCE;
use temerge::lib::insertions::{merge_insertion_files,write_insertions};
extern crate pretty_env_logger;


fn main() {
    pretty_env_logger::init();

    let default_distance = MERGE_DISTANCE.to_string();
    let matches = app_from_crate!()
            .about("This tool merges per-sample TE insertion calls. \
            It expects tab-separated files with the columns ins_chrom, ins_start, ins_end, \
            ref_chrom, ref_start, ref_end and the TE identifier, one file per sample. \
            An 8th column with supporting read ids is ignored. \
            The result is a tab-separated table with the merged events, their TE identifiers \
            and the comma-joined list of samples carrying each event.")
            .arg(Arg::with_name("INPUT")
                .short("i")
                .long("input")
                .value_name("bed")
                .help("the insertion call files to merge, one per sample")
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
            .arg(Arg::with_name("DISTANCE")
                .short("d")
                .long("distance")
                .value_name("int")
                .help("the distance in bp within which insertion calls are combined")
                .takes_value(true)
                .required(false)
                .default_value(&default_distance))
            .get_matches();

    let files : Vec<String> = matches.values_of("INPUT").unwrap().map(|x| x.to_string()).collect();
    let out      = matches.value_of("OUT");
    let distance = matches.value_of("DISTANCE").unwrap().parse::<u64>().unwrap();

    let merged = merge_insertion_files(&files,distance);
    write_insertions(&merged,out).expect("ERROR: could not write results!");
}
