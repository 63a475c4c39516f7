use rs_textmodel_core::model::ngram_model::NGramModel;
use rs_textmodel_core::vectorspace::index::DocumentIndex;

const SAMPLE: &str = "\
The quick brown fox jumps over the lazy dog. \
The lazy dog sleeps in the warm sun. \
The quick fox runs through the green field. \
A brown dog chases the quick fox. \
The warm sun shines over the green field.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // --- Markov models -----------------------------------------------

    // Learn word transitions from the sample corpus
    let mut bigrams = NGramModel::bigram();
    bigrams.learn(SAMPLE)?;

    let mut trigrams = NGramModel::trigram();
    trigrams.learn(SAMPLE)?;

    // Single-step prediction: feed the previous word back as context
    println!("after 'the': {}", bigrams.predict(&["the"]));
    println!("after 'quick': {}", bigrams.predict(&["quick"]));

    // Most-frequent mode; ties are resolved fairly at random
    println!("most frequent after 'the': {}", bigrams.predict_frequent(&["the"]));

    // Whole sequences: seeded, or opened from the learned start words
    println!("bigram sequence:  {}", bigrams.predict_sequence(Some("the"), 8));
    println!("trigram sequence: {}", trigrams.predict_sequence(None, 8));

    // An unseen context is not an error; each model has its fallback
    assert_eq!(bigrams.predict(&["zeppelin"]), "");
    assert_eq!(trigrams.predict(&["lead", "zeppelin"]), ".");

    // --- Vector-space index ------------------------------------------

    let mut index = DocumentIndex::new();
    index.add_document("fox", "The quick brown fox jumps over the lazy dog.")?;
    index.add_document("dog", "The lazy dog sleeps in the warm sun.")?;
    index.add_document("field", "The quick fox runs through the green field.")?;

    // Adding the same name twice fails; the first document stays
    match index.add_document("fox", "another fox text") {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("rejected: {e}"),
    }

    for hit in index.query("quick fox") {
        println!("{}: {:.4}", hit.name, hit.score);
    }

    // Importing stopwords re-indexes the existing corpus destructively
    index.import_stopwords("the a in over");
    println!("after stopword import:");
    for hit in index.query("the quick fox") {
        println!("{}: {:.4}", hit.name, hit.score);
    }

    Ok(())
}
