use std::fs::File;
use std::io::{BufRead, BufReader};
use std::io::stdout;
use std::io::Write;
use std::path::Path;
use log::debug;


/// The distance in bp within which two intervals are still
/// considered to describe the same insertion event. Matches the
/// clustering distance of the coarse pre-grouping so that cluster
/// membership and within-cluster merging use the same notion of "close".
pub const MERGE_DISTANCE : u64 = 50;


/// Decides whether two intervals on the same chromosome overlap,
/// allowing them to be up to `tolerance` bp apart. The caller is
/// responsible for only comparing intervals of the same chromosome,
/// this is not verified here.
/// The naive formulation `end1 >= start2 - tolerance` underflows for
/// unsigned positions close to the chromosome start, therefore the
/// tolerance is added on the other side of the comparison.
///
/// Unittest: TRUE
///
/// Example:
/// ```rust
/// use temerge::lib::common::overlaps;
/// assert!(overlaps(100,200,230,300,50));
/// assert!(!overlaps(100,200,251,300,50));
/// ```
pub fn overlaps(
    start1: u64,
    end1  : u64,
    start2: u64,
    end2  : u64,
    tolerance: u64
) -> bool {
    start1 <= end2 + tolerance && start2 <= end1 + tolerance
}


/// Derives the sample identifier (accession) from an input file path.
/// It simply takes the basename and removes the last extension,
/// e.g. "calls/sampleA.bed" becomes "sampleA".
/// Files without any extension keep their full basename.
///
/// Unittest: TRUE
///
pub fn sample_from_path(
    my_file: &str
) -> String {
    let base = Path::new(my_file)
        .file_name()
        .expect("ERROR: input path has no file name!")
        .to_string_lossy();
    match base.rsplit_once('.') {
        Some((stem,_)) if !stem.is_empty() => stem.to_string(),
        _ => base.to_string(),
    }
}


/// Splits a comma-separated field into its entries.
/// Empty entries (e.g. from a trailing comma) are dropped.
///
/// Unittest: TRUE
///
pub fn split_comma_list(
    field: &str
) -> Vec<String> {
    field.split(',')
        .filter(|x| !x.is_empty())
        .map(|x| x.to_string())
        .collect()
}


/// Returns a writer for either the given output file or stdout
/// if no file was requested.
///
/// Unittest: FALSE
///
pub fn out_writer(
    out_file: Option<&str>
) -> Box<dyn Write> {
    //shamelessly taken 1:1 from https://stackoverflow.com/a/42216134/11255396
    match out_file {
        Some(x) => {
            let path = Path::new(x);
            Box::new(File::create(path).expect("ERROR: could not create output file!")) as Box<dyn Write>
        }
        None => Box::new(stdout()) as Box<dyn Write>,
    }
}


/// adapted from here https://users.rust-lang.org/t/efficient-way-of-checking-if-two-files-have-the-same-content/74735
/// very useful for tests with external files and to verify that the results is identical
/// to a previously manually generated result file
pub fn is_same_file(
    file1: &str,
    file2: &str
) -> Result<bool, std::io::Error> {
    debug!("comparing file1 {:?} and file2 {:?} with each other", file1, file2);
    let f1 = File::open(file1).expect("ERROR: could not open file");
    let f2 = File::open(file2).expect("ERROR: could not open file");

    // Use buf readers since they are much faster
    let f1r = BufReader::new(f1);
    let f2r = BufReader::new(f2);

    // Do a byte to byte comparison of the two files
    let mut lines1 = f1r.lines();
    let mut lines2 = f2r.lines();
    loop {
        match (lines1.next(),lines2.next()) {
            (None,None)         => return Ok(true),
            (Some(l1),Some(l2)) => {
                if l1? != l2? {
                    return Ok(false);
                }
            },
            _ => return Ok(false),
        }
    }
}


#[cfg(test)]
mod tests {
    // Note this useful idiom: importing names from outer (for mod tests) scope.
    use super::*;

    #[test]
    fn overlap_contained() {
        // one interval fully within the other
        assert!(overlaps(100,500,200,300,50));
    }

    #[test]
    fn overlap_symmetric() {
        let cases : Vec<(u64,u64,u64,u64)> = vec![
            (100,200,230,300),
            (100,200,251,300),
            (0,10,60,70),
            (500,600,100,200),
            (1,1,1,1),
        ];
        for (a,b,c,d) in cases {
            assert_eq!(
                overlaps(a,b,c,d,50),
                overlaps(c,d,a,b,50)
            );
        }
    }

    #[test]
    fn overlap_boundary() {
        // exactly `tolerance` apart still overlaps,
        // one bp further does not anymore
        assert!(overlaps(0,10,60,70,50));
        assert!(!overlaps(0,10,61,70,50));
        assert!(overlaps(60,70,0,10,50));
        assert!(!overlaps(61,70,0,10,50));
    }

    #[test]
    fn overlap_near_origin() {
        // intervals close to position 0 must not underflow
        assert!(overlaps(0,1,40,50,50));
        assert!(overlaps(40,50,0,1,50));
    }

    #[test]
    fn sample_name_simple() {
        assert_eq!(sample_from_path("sampleA.bed"),String::from("sampleA"));
    }

    #[test]
    fn sample_name_with_dirs() {
        assert_eq!(sample_from_path("/calls/batch1/sampleB.txt"),String::from("sampleB"));
    }

    #[test]
    fn sample_name_double_extension() {
        // only the last extension is removed
        assert_eq!(sample_from_path("sampleC.insertions.bed"),String::from("sampleC.insertions"));
    }

    #[test]
    fn sample_name_no_extension() {
        assert_eq!(sample_from_path("sampleD"),String::from("sampleD"));
    }

    #[test]
    fn comma_list() {
        assert_eq!(split_comma_list("AT1G01010,AT2G02020"),vec![String::from("AT1G01010"),String::from("AT2G02020")]);
        assert_eq!(split_comma_list("single"),vec![String::from("single")]);
        assert_eq!(split_comma_list("trailing,"),vec![String::from("trailing")]);
    }
}
