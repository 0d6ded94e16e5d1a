use std::error::Error;
use std::path::Path;
use itertools::Itertools;
use log::{debug,info};
use crate::lib::common::{overlaps,sample_from_path,split_comma_list,out_writer};


#[derive(Debug,Clone,PartialEq,Eq)]
/// A TE insertion call. Records both the insertion locus on the sample
/// and the locus of the donor element on the reference genome.
/// `te_ids` and `accessions` hold more than one entry once a record
/// represents several merged input rows. Both are kept duplicate-free
/// and in first-seen order so that output stays deterministic.
/// All coordinates are the verbatim 0-based BED positions of the caller.
pub struct InsertionCall {
    /// chromosome of the insertion site
    pub ins_chrom: String,
    /// start of the insertion site
    pub ins_start: u64,
    /// end of the insertion site
    pub ins_end  : u64,
    /// chromosome of the donor TE on the reference
    pub ref_chrom: String,
    /// start of the donor TE on the reference
    pub ref_start: u64,
    /// end of the donor TE on the reference
    pub ref_end  : u64,
    /// identifiers of the TE family/locus, e.g. AGI codes
    pub te_ids   : Vec<String>,
    /// samples which carry this insertion, no duplicates
    pub accessions: Vec<String>,
    /// id of the coarse proximity cluster, 1-based, assigned
    /// by [cluster_insertions]
    pub cluster  : u64,
}


// set semantics on the order-preserving vectors
fn lists_intersect(
    list_a: &[String],
    list_b: &[String]
) -> bool {
    list_a.iter().any(|x| list_b.contains(x))
}

fn union_into(
    target: &mut Vec<String>,
    other : &[String]
) {
    for entry in other {
        if !target.contains(entry) {
            target.push(entry.clone());
        }
    }
}


/// Reads one sample's insertion candidates from a tab-separated BED-like
/// file. The first 7 columns are used: ins_chrom, ins_start, ins_end,
/// ref_chrom, ref_start, ref_end and the TE identifier which may itself
/// be a comma-separated list. An 8th column with the supporting read
/// ids is ignored. Fewer than 7 columns or non-numeric coordinates are
/// fatal. The accession of every returned call is derived from the
/// file name.
///
/// Unittest: TRUE
///
pub fn read_insertion_file(
    my_file: &str
) -> Vec<InsertionCall> {
    assert!(
        Path::new(my_file).exists(),
        "ERROR: insertion file {:?} does not exist!",
        my_file
    );
    let sample = sample_from_path(my_file);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(my_file)
        .expect("ERROR: unable to open insertion file!");
    let mut calls : Vec<InsertionCall> = Vec::new();
    for record in reader.records() {
        let record = record.expect("ERROR: could not read insertion record!");
        if record.len() < 7 {
            panic!("ERROR: insertion record with fewer than 7 columns in {:?}!",my_file);
        }
        calls.push(InsertionCall{
            ins_chrom: record[0].to_string(),
            ins_start: record[1].parse::<u64>().expect("ERROR: could not parse ins_start!"),
            ins_end  : record[2].parse::<u64>().expect("ERROR: could not parse ins_end!"),
            ref_chrom: record[3].to_string(),
            ref_start: record[4].parse::<u64>().expect("ERROR: could not parse ref_start!"),
            ref_end  : record[5].parse::<u64>().expect("ERROR: could not parse ref_end!"),
            te_ids   : split_comma_list(&record[6]),
            accessions: vec![sample.clone()],
            cluster  : 0,
        });
    }
    debug!("read {} insertion candidates from {:?} as sample {:?}",calls.len(),my_file,&sample);
    calls
}


/// Groups insertion candidates of all samples into coarse proximity
/// clusters. Records are sorted by insertion chromosome and position,
/// then a record joins the open cluster when it lies within
/// `clust_dist` bp of the cluster span seen so far, extending that span.
/// Membership therefore chains transitively: A within distance of B and
/// B within distance of C puts all three into one cluster even when A
/// and C are further apart. Such over-wide clusters are taken apart
/// again by [split_clusters].
/// Returns the sorted records with their 1-based cluster id assigned.
///
/// Unittest: TRUE
///
/// Example:
///
/// ```bash
///  100--------200
///          180------300
///                       330-----400        cluster 1 (within 50 of 300)
///
///                                                    800---900  cluster 2
/// ```
pub fn cluster_insertions(
    mut calls : Vec<InsertionCall>,
    clust_dist: u64
) -> Vec<InsertionCall> {
    calls.sort_by(|x1,x2| {
        x1.ins_chrom.cmp(&x2.ins_chrom)
            .then(x1.ins_start.cmp(&x2.ins_start))
            .then(x1.ins_end.cmp(&x2.ins_end))
    });
    let mut cluster_id : u64 = 0;
    // chromosome and maximal end of the currently open cluster
    let mut prev_chrom : Option<String> = None;
    let mut prev_end   : u64 = 0;
    for call in calls.iter_mut() {
        if prev_chrom.as_deref() == Some(call.ins_chrom.as_str())
            && call.ins_start <= prev_end + clust_dist
        {
            if call.ins_end > prev_end {
                prev_end = call.ins_end;
            }
        }else{
            cluster_id += 1;
            prev_chrom  = Some(call.ins_chrom.clone());
            prev_end    = call.ins_end;
        }
        call.cluster = cluster_id;
    }
    debug!("assigned {} coarse clusters",cluster_id);
    calls
}


/// Collapses the members of one coarse cluster into the truly distinct
/// events. Members are processed in their given order against a growing
/// accumulator: the current record is merged into the first accumulator
/// entry that shares a TE identity, overlaps within `tolerance` bp,
/// lies on the same insertion and reference chromosome and agrees on
/// the reference start. A record without any matching entry becomes a
/// new entry itself.
/// When the TE identity sets differ in size, the reference start of the
/// record with the larger set counts as the established locus and is
/// the one the smaller record is checked against. The entry's own
/// coordinates are never rewritten.
/// Note that merging stops at the first matching entry, so the result
/// is a single greedy pass and not a transitive closure: whether two
/// borderline records end up together can depend on the processing
/// order. This matches the long-standing behaviour of the published
/// call sets.
///
/// Unittest: TRUE
///
pub fn split_cluster(
    members  : Vec<InsertionCall>,
    tolerance: u64
) -> Vec<InsertionCall> {
    let mut result : Vec<InsertionCall> = Vec::new();
    for call in members {
        let mut merged = false;
        for entry in result.iter_mut() {
            if !lists_intersect(&entry.te_ids,&call.te_ids) {
                continue
            }
            if !overlaps(entry.ins_start,entry.ins_end,call.ins_start,call.ins_end,tolerance) {
                continue
            }
            if entry.ins_chrom != call.ins_chrom || entry.ref_chrom != call.ref_chrom {
                continue
            }
            // the record with more TE identities is treated as the more
            // specific locus, a less specific record adopts its
            // reference start for this comparison only
            let ref_start = match call.te_ids.len() < entry.te_ids.len() {
                true  => entry.ref_start,
                false => call.ref_start,
            };
            if ref_start != entry.ref_start {
                continue
            }
            union_into(&mut entry.accessions,&call.accessions);
            union_into(&mut entry.te_ids,&call.te_ids);
            merged = true;
            // first match wins, later entries are not considered
            break
        }
        if !merged {
            result.push(call);
        }
    }
    result
}


/// Applies [split_cluster] to every coarse cluster and flattens the
/// results into the final deduplicated insertion call set. Expects the
/// records cluster-contiguous as returned by [cluster_insertions].
///
/// Unittest: TRUE
///
pub fn split_clusters(
    calls    : Vec<InsertionCall>,
    tolerance: u64
) -> Vec<InsertionCall> {
    let n_input = calls.len();
    let mut result : Vec<InsertionCall> = Vec::new();
    for (cluster,members) in &calls.into_iter().chunk_by(|x| x.cluster) {
        let members : Vec<InsertionCall> = members.collect();
        debug!("splitting cluster {} with {} members",cluster,members.len());
        result.extend(split_cluster(members,tolerance));
    }
    info!("found {} mergeable insertions",n_input - result.len());
    result
}


/// The full insertion pipeline: read all sample files, cluster the
/// combined candidates by proximity and split the clusters into the
/// final events.
///
/// Unittest: TRUE
///
pub fn merge_insertion_files(
    files     : &[String],
    clust_dist: u64
) -> Vec<InsertionCall> {
    let mut calls : Vec<InsertionCall> = Vec::new();
    for my_file in files {
        calls.extend(read_insertion_file(my_file));
    }
    let clustered = cluster_insertions(calls,clust_dist);
    split_clusters(clustered,clust_dist)
}


/// Writes the final call set as a tab-separated table without header:
/// ins_chrom, ins_start, ins_end, ref_chrom, ref_start, ref_end,
/// comma-joined TE ids, comma-joined accessions and the cluster id.
///
/// Unittest: TRUE
///
pub fn write_insertions(
    calls   : &[InsertionCall],
    out_file: Option<&str>
) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(out_writer(out_file));
    for call in calls {
        writer.write_record(&[
            call.ins_chrom.clone(),
            call.ins_start.to_string(),
            call.ins_end.to_string(),
            call.ref_chrom.clone(),
            call.ref_start.to_string(),
            call.ref_end.to_string(),
            call.te_ids.join(","),
            call.accessions.join(","),
            call.cluster.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
