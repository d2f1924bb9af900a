#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use text_clf::config::{Config, DataConfig, LogRegConfig, OutputConfig, TfidfConfig};

const POSITIVE: [&str; 5] = ["great", "brilliant", "lovely", "superb", "charming"];
const NEGATIVE: [&str; 5] = ["awful", "boring", "terrible", "dull", "tedious"];
const FILLER: [&str; 4] = ["the", "movie", "plot", "acting"];

/// A fresh, uniquely named directory under the system temp dir
pub fn temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "text-clf-it-{prefix}-{:016x}",
        rand::random::<u64>()
    ));
    fs::create_dir_all(&dir).unwrap();

    dir
}

/// `n` labeled reviews alternating between the "pos" and "neg" classes
pub fn reviews(n: usize, offset: usize) -> Vec<(String, String)> {
    (0..n)
        .map(|i| {
            let seed = i + offset;
            let (words, label) = if i % 2 == 0 {
                (&POSITIVE, "pos")
            } else {
                (&NEGATIVE, "neg")
            };

            let text = format!(
                "{} {} was {} and {}",
                FILLER[seed % 2],
                FILLER[2 + seed % 2],
                words[seed % 5],
                words[(seed / 5 + 1) % 5]
            );

            (text, label.to_string())
        })
        .collect()
}

/// Write examples as a CSV with a leading unnamed index column
pub fn write_csv(path: &Path, examples: &[(String, String)]) {
    let mut content = String::from(",Text,Class\n");

    for (index, (text, label)) in examples.iter().enumerate() {
        content.push_str(&format!("{index},{text},{label}\n"));
    }

    fs::write(path, content).unwrap();
}

/// Write 100 train and 20 test reviews under `dir` and point a config at them
pub fn experiment(dir: &Path) -> Config {
    let train_data_path = dir.join("data_train.csv");
    let test_data_path = dir.join("data_test.csv");

    write_csv(&train_data_path, &reviews(100, 0));
    write_csv(&test_data_path, &reviews(20, 3));

    Config {
        data: DataConfig {
            train_data_path,
            test_data_path,
            sep: ",".to_string(),
            text_column: "Text".to_string(),
            target_column: "Class".to_string(),
        },
        tfidf: TfidfConfig::default(),
        logreg: LogRegConfig {
            num_epochs: 100,
            ..LogRegConfig::default()
        },
        output: OutputConfig {
            artifacts_dir: dir.join("saved_models").join("log_reg_tf_idf"),
            model_name: "model".to_string(),
        },
    }
}
