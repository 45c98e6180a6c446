//! Feature Engineering Walkthrough: House Listings
//!
//! This example runs every transformer on a small listings dataset:
//! - Loading mixed-type records from CSV
//! - One-hot and ordinal encoding of the neighborhood
//! - TF-IDF vectorization of listing descriptions
//! - Mean and forward-fill imputation
//! - Standard and min-max scaling
//! - Polynomial feature expansion
//! - A predictive pipeline with linear regression, saved and reloaded
//!
//! Run with: RUST_LOG=featurecraft=debug cargo run --example feature_engineering

use featurecraft::data::{Dataset, FeatureMatrix};
use featurecraft::model::LinearRegression;
use featurecraft::preprocessing::{
    FeatureNaming, FittedOneHotEncoder, FittedPredictivePipeline, FittedTransformer,
    ImputeStrategy, MinMaxScaler, OneHotEncoder, OrdinalEncoder, Pipeline, PolynomialFeatures,
    PredictivePipeline, SimpleImputer, StandardScaler, TextVectorizer, Tokenizer, Transformer,
};
use std::error::Error;

const LISTINGS: &str = "\
neighborhood,sqft,bedrooms,price
Fremont,800,2,420
Queen Anne,1200,NA,610
Fremont,1500,3,700
Ballard,1100,2,560
Queen Anne,2000,4,930
Ballard,,3,600
";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "featurecraft=info".into()),
        )
        .init();

    println!("=== Feature Engineering Walkthrough ===\n");

    // 1. Load records
    let listings = Dataset::from_csv_reader(LISTINGS.as_bytes())?;
    println!(
        "Loaded {} listings with fields {:?}",
        listings.len(),
        listings.fields()
    );

    // 2. Categorical encoding
    let hoods = Dataset::from_column(
        "neighborhood",
        listings.column("neighborhood").cloned().collect::<Vec<_>>(),
    );
    let one_hot = OneHotEncoder::new()
        .with_naming(FeatureNaming::ValueOnly)
        .fit(&hoods)?;
    let encoded = one_hot.transform(&hoods)?;
    println!("\nOne-hot columns: {:?}", encoded.columns());
    for row in encoded.to_rows() {
        println!("  {:?}", row);
    }

    let ordinal = OrdinalEncoder::new().fit(&hoods)?;
    let codes = ordinal.transform(&hoods)?;
    println!(
        "Ordinal codes: {:?} (categories {:?})",
        codes.values().column(0).to_vec(),
        ordinal.categories("neighborhood").unwrap_or_default()
    );

    // 3. Text vectorization
    let descriptions = [
        "Bright corner unit with a view of the lake",
        "Quiet street, updated kitchen and a view",
        "Updated bathroom and bright kitchen",
    ];
    let vectorizer = TextVectorizer::tfidf()
        .with_tokenizer(Tokenizer::new().with_english_stop_words())
        .fit_documents(&descriptions)?;
    let tfidf = vectorizer.transform_documents(&descriptions)?;
    println!("\nVocabulary: {:?}", tfidf.columns());
    if let Some(idf) = vectorizer.idf() {
        println!("IDF: {:?}", idf);
    }

    // 4. Imputation
    let numeric = FeatureMatrix::from_columns(vec![
        ("reading".to_string(), vec![1.0, f64::NAN, 3.0, 3.0, 4.0, 8.0]),
    ])?;
    let mean_filled = SimpleImputer::new(ImputeStrategy::Mean).fit_transform(&numeric)?;
    let ffilled = SimpleImputer::new(ImputeStrategy::ForwardFill).fit_transform(&numeric)?;
    println!("\nMean-imputed:    {:?}", mean_filled.values().column(0).to_vec());
    println!("Forward-filled:  {:?}", ffilled.values().column(0).to_vec());

    // 5. Scaling
    let standard = StandardScaler::new().fit_transform(&mean_filled)?;
    let minmax = MinMaxScaler::new().fit_transform(&mean_filled)?;
    println!("Standardized:    {:?}", standard.values().column(0).to_vec());
    println!("Min-max scaled:  {:?}", minmax.values().column(0).to_vec());

    // 6. Polynomial features
    let pair = FeatureMatrix::from_columns(vec![
        ("a".to_string(), vec![2.0]),
        ("b".to_string(), vec![3.0]),
    ])?;
    let expanded = PolynomialFeatures::new().with_degree(2).expand(&pair)?;
    println!("\nPolynomial columns: {:?}", expanded.columns());
    println!("Polynomial values:  {:?}", expanded.to_rows()[0]);

    // 7. Predictive pipeline on the listings
    let prices: Vec<f64> = listings
        .column("price")
        .map(|v| v.as_number().unwrap_or(f64::NAN))
        .collect();
    let features = Dataset::new(
        listings
            .records()
            .iter()
            .map(|r| {
                r.iter()
                    .filter(|(k, _)| *k != "price")
                    .map(|(k, v)| (k, v.clone()))
                    .collect()
            })
            .collect(),
    );

    let pipeline = Pipeline::with_head(OneHotEncoder::new())
        .add_simple_imputer(SimpleImputer::new(ImputeStrategy::Median))
        .add_standard_scaler(StandardScaler::new());
    let fitted = PredictivePipeline::new(pipeline, LinearRegression::new())
        .fit(&features, &prices)?;
    println!("\nPipeline stages: {:?}", fitted.pipeline().step_names());
    println!("Features out:    {:?}", fitted.pipeline().feature_names_out());

    let path = std::env::temp_dir().join("featurecraft_listings.bin");
    fitted.save_to_file(&path)?;
    let loaded =
        FittedPredictivePipeline::<FittedOneHotEncoder, LinearRegression>::load_from_file(&path)?;
    let predictions = loaded.predict(&features)?;

    println!("\n{:>10} {:>10}", "actual", "predicted");
    for (actual, predicted) in prices.iter().zip(predictions.iter()) {
        println!("{:>10.1} {:>10.1}", actual, predicted);
    }
    std::fs::remove_file(path).ok();

    Ok(())
}
