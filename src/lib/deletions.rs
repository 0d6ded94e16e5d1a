use indexmap::IndexMap;
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::io::Write;
use std::path::Path;
use log::debug;
use crate::lib::common::{sample_from_path,split_comma_list,out_writer};


#[derive(Debug,Clone,PartialEq,Eq)]
/// A TE deletion call relative to the reference genome.
/// Coordinates are kept as the verbatim text of the caller since
/// deletion calls from different samples are only combined on an exact
/// textual match and never on a fuzzy overlap. The strand column is part
/// of the caller coordinates and only removed later by the inversion tool.
pub struct DeletionCall {
    /// chromosome of the deleted element
    pub chrom : String,
    /// start of the deleted element
    pub start : String,
    /// end of the deleted element
    pub end   : String,
    /// strand of the deleted element
    pub strand: String,
    /// identifier of the TE family/locus, e.g. AGI code
    pub te_id : String,
    /// samples which support this deletion, no duplicates
    pub accessions: Vec<String>,
}

impl DeletionCall {
    /// the identity key under which calls of different samples are
    /// considered the same event: exact match of all caller coordinates
    /// plus the TE identifier
    pub fn identity (&self) -> String {
        format!("{}\t{}\t{}\t{}\t{}",self.chrom,self.start,self.end,self.strand,self.te_id)
    }
}


/// Reads one sample's deletion calls. Expects tab-separated rows with at
/// least 5 columns: chrom, start, end, strand and the TE identifier.
/// Additional columns are ignored, rows with fewer columns are fatal.
/// A header line as written by the up-stream caller is skipped.
/// The accession of every returned call is the provided sample name.
///
/// Unittest: TRUE
///
pub fn read_deletion_file(
    my_file: &str,
    sample : &str
) -> Vec<DeletionCall> {
    assert!(
        Path::new(my_file).exists(),
        "ERROR: deletion file {:?} does not exist!",
        my_file
    );
    let input  = File::open(my_file).expect("ERROR: unable to open deletion file!");
    let reader = BufReader::new(input);
    let mut calls : Vec<DeletionCall> = Vec::new();
    for line in reader.lines() {
        let l = line.expect("ERROR: could not read line!");
        if l.is_empty() {
            continue
        }
        let fields: Vec<&str> = l.split('\t').collect();
        // up-stream TE callers occasionally leave their header in place
        if fields[0].starts_with("ins_chr") {
            continue
        }
        if fields.len() < 5 {
            panic!("ERROR: deletion record with fewer than 5 columns in {:?}!",my_file);
        }
        calls.push(DeletionCall{
            chrom : fields[0].to_string(),
            start : fields[1].to_string(),
            end   : fields[2].to_string(),
            strand: fields[3].to_string(),
            te_id : fields[4].to_string(),
            accessions: vec![sample.to_string()],
        });
    }
    calls
}


/// Folds the deletion calls of all provided sample files into one master
/// collection. The first file seeds the collection, every following
/// file is compared record by record: an exact identity match appends
/// the sample to the accession list of the existing record, anything
/// else becomes a new record. The master keeps records in
/// first-appearance order and holds at most one record per identity key.
///
/// Unittest: TRUE
///
pub fn merge_deletion_files(
    files: &[String]
) -> IndexMap<String,DeletionCall> {
    let mut master : IndexMap<String,DeletionCall> = IndexMap::new();
    for my_file in files {
        let sample = sample_from_path(my_file);
        debug!("merging deletion file {:?} as sample {:?}",my_file,&sample);
        for call in read_deletion_file(my_file,&sample) {
            match master.get_mut(&call.identity()) {
                Some(hit) => {
                    if !hit.accessions.contains(&sample) {
                        hit.accessions.push(sample.clone());
                    }
                },
                None => {
                    master.insert(call.identity(),call);
                },
            }
        }
    }
    master
}


/// Writes the merged master collection as tab-separated rows:
/// chrom, start, end, strand, TE id and the comma-joined accession list.
///
/// Unittest: TRUE
///
pub fn write_merged_deletions(
    master  : &IndexMap<String,DeletionCall>,
    out_file: Option<&str>
) -> Result<(), Box<dyn Error>> {
    let mut writer = out_writer(out_file);
    for call in master.values() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            call.chrom,call.start,call.end,call.strand,call.te_id,
            call.accessions.join(",")
        )?;
    }
    Ok(())
}


/// Converts the accession list of a deletion record from "samples which
/// share this deletion" into "samples which do NOT have it", always
/// headed by the reference sample. This gives deletions the same
/// carrier semantic as insertions.
/// Roster members which never appeared in any input list are simply
/// complement members, this is not an error. The reference itself is
/// skipped while walking the roster so it can never show up twice.
///
/// Unittest: TRUE
///
pub fn invert_accessions(
    listed   : &[String],
    roster   : &[String],
    reference: &str
) -> Vec<String> {
    let mut inverted : Vec<String> = vec![reference.to_string()];
    for sample in roster {
        if sample != reference && !listed.contains(sample) {
            inverted.push(sample.clone());
        }
    }
    inverted
}


/// Rewrites a merged deletion file into the inverted representation.
/// Input rows need at least 6 columns: chrom, start, end, strand, TE id
/// and the comma-joined accession list. The strand column is dropped on
/// output since insertion records carry none, giving both variant types
/// the same schema: chrom, start, end, TE id, inverted accession list.
///
/// Unittest: TRUE
///
pub fn flip_deletion_file(
    my_file  : &str,
    roster   : &[String],
    reference: &str,
    out_file : Option<&str>
) -> Result<(), Box<dyn Error>> {
    assert!(
        Path::new(my_file).exists(),
        "ERROR: merged deletion file {:?} does not exist!",
        my_file
    );
    let input      = File::open(my_file).expect("ERROR: unable to open merged deletion file!");
    let reader     = BufReader::new(input);
    let mut writer = out_writer(out_file);
    for line in reader.lines() {
        let l = line.expect("ERROR: could not read line!");
        if l.is_empty() {
            continue
        }
        let fields: Vec<&str> = l.split('\t').collect();
        if fields.len() < 6 {
            panic!("ERROR: merged deletion record with fewer than 6 columns in {:?}!",my_file);
        }
        let listed   = split_comma_list(fields[5]);
        let inverted = invert_accessions(&listed,roster,reference);
        debug!("accessions {:?} inverted to {:?}",&listed,&inverted);
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            fields[0],fields[1],fields[2],fields[4],
            inverted.join(",")
        )?;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    // Note this useful idiom: importing names from outer (for mod tests) scope.
    use super::*;
    use crate::lib::common::is_same_file;
    use std::io::Write as IoWrite;
    use tempfile::tempdir;

    // writes one deletion file with a fixed name into the given
    // directory so that the derived sample name is predictable
    fn write_sample_file(
        dir : &std::path::Path,
        name: &str,
        rows: &[&str]
    ) -> String {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).expect("ERROR: could not create test file!");
        for row in rows {
            writeln!(file,"{}",row).expect("ERROR: could not write test file!");
        }
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn merge_identical_rows() {
        // identical caller coordinates in two samples collapse into one
        // record supported by both
        let dir = tempdir().unwrap();
        let file_a = write_sample_file(dir.path(),"sampleA.txt",&["chr1\t100\t200\t+\tAGI1"]);
        let file_b = write_sample_file(dir.path(),"sampleB.txt",&["chr1\t100\t200\t+\tAGI1"]);
        let master = merge_deletion_files(&[file_a,file_b]);
        assert_eq!(master.len(),1);
        let call = master.values().next().unwrap();
        assert_eq!(call.accessions,vec![String::from("sampleA"),String::from("sampleB")]);
    }

    #[test]
    fn merge_distinct_rows() {
        // a different TE id is a different event even at identical coordinates
        let dir = tempdir().unwrap();
        let file_a = write_sample_file(dir.path(),"sampleA.txt",&["chr1\t100\t200\t+\tAGI1"]);
        let file_b = write_sample_file(dir.path(),"sampleB.txt",&["chr1\t100\t200\t+\tAGI2"]);
        let master = merge_deletion_files(&[file_a,file_b]);
        assert_eq!(master.len(),2);
    }

    #[test]
    fn merge_identity_keys_unique() {
        // duplicates within one sample must not create two master records
        // and must not list the sample twice
        let dir = tempdir().unwrap();
        let file_a = write_sample_file(
            dir.path(),
            "sampleA.txt",
            &["chr1\t100\t200\t+\tAGI1","chr1\t100\t200\t+\tAGI1"]
        );
        let master = merge_deletion_files(&[file_a]);
        assert_eq!(master.len(),1);
        assert_eq!(master.values().next().unwrap().accessions,vec![String::from("sampleA")]);
    }

    #[test]
    fn header_rows_skipped() {
        // both the short and the long header variant of up-stream
        // callers must be ignored
        let dir = tempdir().unwrap();
        let file_a = write_sample_file(
            dir.path(),
            "sampleA.txt",
            &[
                "ins_chr\tstart\tend\tstrand\tte",
                "ins_chrom\tins_start\tins_end\tstrand\tte_id",
                "chr1\t100\t200\t+\tAGI1",
            ]
        );
        let master = merge_deletion_files(&[file_a]);
        assert_eq!(master.len(),1);
        assert_eq!(master.values().next().unwrap().chrom,String::from("chr1"));
    }

    #[test]
    #[should_panic]
    fn malformed_deletion_row() {
        let dir = tempdir().unwrap();
        let file_a = write_sample_file(dir.path(),"sampleA.txt",&["chr1\t100\t200"]);
        let _ = merge_deletion_files(&[file_a]);
    }

    #[test]
    fn merged_output_format() {
        // the end-to-end example: two samples, identical call, one row
        let dir = tempdir().unwrap();
        let file_a = write_sample_file(dir.path(),"sampleA.txt",&["chr1\t100\t200\t+\tAGI1"]);
        let file_b = write_sample_file(dir.path(),"sampleB.txt",&["chr1\t100\t200\t+\tAGI1"]);
        let master  = merge_deletion_files(&[file_a,file_b]);
        let out     = dir.path().join("merged.txt");
        write_merged_deletions(&master,Some(out.to_str().unwrap())).unwrap();
        let expect  = write_sample_file(dir.path(),"expect.txt",&["chr1\t100\t200\t+\tAGI1\tsampleA,sampleB"]);
        assert!(is_same_file(out.to_str().unwrap(),&expect).unwrap());
    }

    #[test]
    fn invert_simple() {
        let roster = vec![String::from("A"),String::from("B"),String::from("C")];
        let listed = vec![String::from("B")];
        let inverted = invert_accessions(&listed,&roster,"A");
        assert_eq!(inverted,vec![String::from("A"),String::from("C")]);
    }

    #[test]
    fn invert_partition() {
        // every roster sample ends up in exactly one of the two lists
        let roster = vec![
            String::from("S1"),String::from("S2"),
            String::from("S3"),String::from("S4"),
        ];
        let listed = vec![String::from("S2"),String::from("S4")];
        let inverted = invert_accessions(&listed,&roster,"Col-0");
        for sample in &roster {
            assert_ne!(listed.contains(sample),inverted.contains(sample));
        }
    }

    #[test]
    fn invert_reference_never_twice() {
        // the reference is part of the roster but absent from the input
        // list, it must still only appear once up front
        let roster = vec![String::from("A"),String::from("B")];
        let listed = vec![String::from("B")];
        let inverted = invert_accessions(&listed,&roster,"A");
        assert_eq!(inverted,vec![String::from("A")]);
    }

    #[test]
    fn invert_unseen_roster_member() {
        // a roster sample which never occurred in any input list is
        // simply a non-carrier, not an error
        let roster = vec![String::from("A"),String::from("neverseen")];
        let listed : Vec<String> = Vec::new();
        let inverted = invert_accessions(&listed,&roster,"Col-0");
        assert_eq!(inverted,vec![String::from("Col-0"),String::from("A"),String::from("neverseen")]);
    }

    #[test]
    fn flip_file_drops_strand() {
        let dir = tempdir().unwrap();
        let merged = write_sample_file(dir.path(),"merged.txt",&["chr1\t100\t200\t+\tAGI1\tsampleB"]);
        let roster = vec![String::from("sampleB"),String::from("sampleC")];
        let out    = dir.path().join("flipped.txt");
        flip_deletion_file(&merged,&roster,"Col-0",Some(out.to_str().unwrap())).unwrap();
        let expect = write_sample_file(dir.path(),"expect.txt",&["chr1\t100\t200\tAGI1\tCol-0,sampleC"]);
        assert!(is_same_file(out.to_str().unwrap(),&expect).unwrap());
    }
}
