// End-to-end conversion over a tiny synthetic corpus.
//
// The Stanford converter is replaced by canned CoNLL-X output so the
// pipeline runs without a JVM: gold_conll → trees → dependencies →
// jsonlines parts → head-word clusters.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;

use corefprep::conll::convert::{convert_corpus, corpus_data_dir, reset_tmp_dir};
use corefprep::conll::converter::DependencyConverter;
use corefprep::conll::document::DocumentPart;
use corefprep::conll::splits::DataSplit;
use corefprep::heads::{convert_split, HeadDocument};
use corefprep::jsonl;

const DEV_DOC: &str = "\
#begin document (nw/wsj/00/wsj_0001); part 000
nw/wsj/00/wsj_0001 0 0 John NNP (TOP(S(NP*) - - - - * (1)
nw/wsj/00/wsj_0001 0 1 left VBD (VP*))) - - - - * -

#end document
#begin document (nw/wsj/00/wsj_0001); part 001
nw/wsj/00/wsj_0001 1 0 He PRP (TOP(S(NP*) - - - - * (1)
nw/wsj/00/wsj_0001 1 1 returned VBD (VP* - - - - * -
nw/wsj/00/wsj_0001 1 2 home NN (NP*))) - - - - * -

#end document
";

const DEV_DEPS: &str = "\
1\tJohn\t_\tNNP\tNNP\t_\t2\tnsubj\t_\t_
2\tleft\t_\tVBD\tVBD\t_\t0\troot\t_\t_

1\tHe\t_\tPRP\tPRP\t_\t2\tnsubj\t_\t_
2\treturned\t_\tVBD\tVBD\t_\t0\troot\t_\t_
3\thome\t_\tNN\tNN\t_\t2\tobj\t_\t_
";

const TEST_DOC: &str = "\
#begin document (bc/cnn/00/cnn_0001); part 000
bc/cnn/00/cnn_0001 0 0 Hello UH (TOP(INTJ*)) - - - Anchor * -

#end document
";

const TEST_DEPS: &str = "1\tHello\t_\tUH\tUH\t_\t0\troot\t_\t_\n";

const TRAIN_DOC: &str = "\
#begin document (nw/wsj/00/wsj_0002); part 000
nw/wsj/00/wsj_0002 0 0 The DT (TOP(S(NP* - - - - * (2
nw/wsj/00/wsj_0002 0 1 dog NN *) - - - - * 2)
nw/wsj/00/wsj_0002 0 2 saw VBD (VP* - - - - * -
nw/wsj/00/wsj_0002 0 3 itself PRP (NP*)))) - - - - * (2)

#end document
";

const TRAIN_DEPS: &str = "\
1\tThe\t_\tDT\tDT\t_\t2\tdet\t_\t_
2\tdog\t_\tNN\tNN\t_\t3\tnsubj\t_\t_
3\tsaw\t_\tVBD\tVBD\t_\t0\troot\t_\t_
4\titself\t_\tPRP\tPRP\t_\t3\tobj\t_\t_
";

/// Serves canned dependency output keyed by tree file name.
struct CannedConverter {
    outputs: HashMap<String, String>,
}

#[async_trait]
impl DependencyConverter for CannedConverter {
    async fn convert(&self, tree_file: &Path) -> Result<String> {
        let name = tree_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.outputs
            .get(&name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no canned output for {name}"))
    }
}

fn canned() -> CannedConverter {
    CannedConverter {
        outputs: HashMap::from([
            ("wsj_0001.v4_gold_conll".to_string(), DEV_DEPS.to_string()),
            ("cnn_0001.v4_gold_conll".to_string(), TEST_DEPS.to_string()),
            ("wsj_0002.v4_gold_conll".to_string(), TRAIN_DEPS.to_string()),
        ]),
    }
}

/// Lay out `<root>/conll-2012/v4/data/<split>/data/english/annotations/...`.
fn write_corpus(root: &Path) -> PathBuf {
    let conll_dir = root.join("conll-2012");
    let data = corpus_data_dir(&conll_dir);
    let files = [
        ("development", "nw/wsj/00/wsj_0001.v4_gold_conll", DEV_DOC),
        ("test", "bc/cnn/00/cnn_0001.v4_gold_conll", TEST_DOC),
        ("train", "nw/wsj/00/wsj_0002.v4_gold_conll", TRAIN_DOC),
    ];
    for (split, relative, text) in files {
        let path = data.join(split).join("data/english/annotations").join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }
    conll_dir
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("corefprep-pipeline-{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[tokio::test]
async fn converts_corpus_into_split_files() {
    let root = scratch("convert");
    let conll_dir = write_corpus(&root);
    let out_dir = root.join("out");
    let tmp_dir = root.join("temp");
    reset_tmp_dir(&tmp_dir).unwrap();

    let summaries = convert_corpus(&conll_dir, &out_dir, &tmp_dir, 2, &canned())
        .await
        .unwrap();

    let counts: Vec<(DataSplit, usize, usize)> =
        summaries.iter().map(|s| (s.split, s.files, s.parts)).collect();
    assert_eq!(
        counts,
        vec![
            (DataSplit::Development, 1, 2),
            (DataSplit::Test, 1, 1),
            (DataSplit::Train, 1, 1),
        ]
    );

    let dev: Vec<DocumentPart> =
        jsonl::read_all(&out_dir.join("english_development.jsonlines")).unwrap();
    assert_eq!(dev[0].part_id, 0);
    assert_eq!(dev[0].cased_words, vec!["John", "left"]);
    assert_eq!(dev[0].clusters, vec![vec![[0, 1]]]);

    assert_eq!(dev[1].part_id, 1);
    assert_eq!(dev[1].sent_id, vec![0, 0, 0]);
    assert_eq!(dev[1].head, vec![Some(1), None, Some(1)]);
    assert_eq!(dev[1].deprel, vec!["nsubj", "root", "obj"]);
    assert_eq!(dev[1].clusters, vec![vec![[0, 1]]]);

    let test: Vec<DocumentPart> = jsonl::read_all(&out_dir.join("english_test.jsonlines")).unwrap();
    assert_eq!(test[0].speaker, vec!["Anchor"]);
    assert!(test[0].clusters.is_empty());

    // intermediate trees mirror the corpus layout
    let tree_file = tmp_dir.join("development/data/english/annotations/nw/wsj/00/wsj_0001.v4_gold_conll");
    let trees = std::fs::read_to_string(&tree_file).unwrap();
    assert_eq!(
        trees.lines().next().unwrap(),
        "(TOP(S(NP(NNP John))(VP(VBD left))))"
    );
    assert!(tmp_dir
        .join("development/data/english/annotations/nw/wsj/00/wsj_0001.v4_gold_conll_dep")
        .exists());

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn converted_output_feeds_head_conversion() {
    let root = scratch("heads");
    let conll_dir = write_corpus(&root);
    let out_dir = root.join("out");
    let tmp_dir = root.join("temp");
    reset_tmp_dir(&tmp_dir).unwrap();

    convert_corpus(&conll_dir, &out_dir, &tmp_dir, 1, &canned())
        .await
        .unwrap();

    let stats = convert_split(&out_dir, DataSplit::Train).unwrap();
    assert_eq!(stats.total_spans, 2);
    assert_eq!(stats.deleted_spans, 0);
    assert_eq!(stats.deleted_clusters, 0);

    let train: Vec<HeadDocument> =
        jsonl::read_all(&out_dir.join("english_train_head.jsonlines")).unwrap();
    assert_eq!(train[0].word_clusters, vec![vec![1, 3]]);
    assert_eq!(train[0].head2span, vec![[1, 0, 2], [3, 3, 4]]);
    assert_eq!(train[0].span_clusters, vec![vec![[0, 2], [3, 4]]]);

    // each dev part keeps a single mention, so no head cluster survives
    let dev_stats = convert_split(&out_dir, DataSplit::Development).unwrap();
    assert_eq!(dev_stats.total_clusters, 2);
    assert_eq!(dev_stats.deleted_clusters, 2);

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn converter_failure_names_the_file() {
    let root = scratch("failure");
    let conll_dir = write_corpus(&root);
    let tmp_dir = root.join("temp");
    reset_tmp_dir(&tmp_dir).unwrap();

    let empty = CannedConverter {
        outputs: HashMap::new(),
    };
    let err = convert_corpus(&conll_dir, &root.join("out"), &tmp_dir, 1, &empty)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("wsj_0001.v4_gold_conll"));

    std::fs::remove_dir_all(&root).unwrap();
}
