use divan::{Bencher, black_box};
use treedeps::{ConversionOptions, reconstruct_corpus, reconstruct_corpus_parallel};

fn main() {
    divan::main();
}

const TREE: &str = "(ROOT (S (NP (NNP Ed)) (VP (VBZ cooks) (CC and) (VBZ sells) \
                    (NP (NP (NNS burritos)) (PP (IN with) (NP (NNS beans) (CC but) \
                    (RB not) (NN rice))))) (. .)))";

const RELATIONS: &str = "nsubj(cooks-2, Ed-1)
root(ROOT-0, cooks-2)
cc(cooks-2, and-3)
conj(cooks-2, sells-4)
dobj(cooks-2, burritos-5)
case(beans-7, with-6)
nmod(burritos-5, beans-7)
cc(beans-7, but-8)
neg(rice-10, not-9)
conj(beans-7, rice-10)
punct(cooks-2, .-11)
";

fn batch(n_sentences: usize) -> (Vec<String>, Vec<&'static str>) {
    let lines = vec![RELATIONS; n_sentences]
        .join("\n")
        .lines()
        .map(str::to_string)
        .collect();
    (lines, vec![TREE; n_sentences])
}

#[divan::bench(args = [100, 1000])]
fn sequential(bencher: Bencher, n_sentences: usize) {
    let (lines, trees) = batch(n_sentences);
    let options = ConversionOptions::default();
    bencher.bench_local(|| {
        black_box(reconstruct_corpus(black_box(&lines), &trees, &options).unwrap())
    });
}

#[divan::bench(args = [100, 1000])]
fn parallel(bencher: Bencher, n_sentences: usize) {
    let (lines, trees) = batch(n_sentences);
    let options = ConversionOptions::default();
    bencher.bench_local(|| {
        black_box(reconstruct_corpus_parallel(black_box(&lines), &trees, &options).unwrap())
    });
}

#[divan::bench]
fn without_punct_and_erased(bencher: Bencher) {
    let (lines, trees) = batch(100);
    let options = ConversionOptions::new().include_punct(false).include_erased(true);
    bencher.bench_local(|| {
        black_box(reconstruct_corpus(black_box(&lines), &trees, &options).unwrap())
    });
}
