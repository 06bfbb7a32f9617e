use std::num::NonZeroUsize;

use moons_trainer::{
    backend::Backend,
    dataset::Dataset,
    training::{Hyperparameters, Trainer},
    MlErr,
};

fn hyper(hidden: usize, learning_rate: f64) -> Hyperparameters {
    Hyperparameters {
        learning_rate,
        reg_lambda: 0.01,
        hidden,
        passes: 0,
        seed: 0,
    }
}

#[test]
fn small_network_learns_the_moons() {
    let dataset = Dataset::<f64>::moons(200, 0.20, 0).unwrap();
    let mut trainer = Trainer::new(dataset, hyper(16, 0.5), Backend::Serial).unwrap();

    let reports = trainer.train(2000, NonZeroUsize::new(100)).unwrap();
    let first = reports.first().unwrap().loss;
    let last = reports.last().unwrap().loss;
    assert!(last < first, "loss went from {first} to {last}");

    let ds = trainer.dataset();
    let accuracy = trainer.accuracy(ds.x(), ds.labels()).unwrap();
    assert!(accuracy > 0.8, "accuracy {accuracy}");
}

#[test]
fn backends_train_identically() {
    let run = |backend| {
        let dataset = Dataset::<f32>::moons(128, 0.20, 3).unwrap();
        let mut trainer = Trainer::new(dataset, hyper(32, 0.1), backend).unwrap();
        trainer.train(30, None).unwrap();
        trainer.params().clone()
    };

    assert_eq!(run(Backend::Serial), run(Backend::Parallel));
}

#[test]
fn single_precision_tracks_double_precision() {
    let single = {
        let dataset = Dataset::<f32>::moons(100, 0.20, 1).unwrap();
        let mut trainer = Trainer::new(dataset, hyper(10, 0.1), Backend::Serial).unwrap();
        trainer.train(50, None).unwrap();
        trainer.params().clone()
    };
    let double = {
        let dataset = Dataset::<f64>::moons(100, 0.20, 1).unwrap();
        let mut trainer = Trainer::new(dataset, hyper(10, 0.1), Backend::Serial).unwrap();
        trainer.train(50, None).unwrap();
        trainer.params().clone()
    };

    for (s, d) in single.w1.iter().zip(&double.w1) {
        assert!((*s as f64 - d).abs() < 1e-3, "{s} vs {d}");
    }
    for (s, d) in single.w2.iter().zip(&double.w2) {
        assert!((*s as f64 - d).abs() < 1e-3, "{s} vs {d}");
    }
}

#[test]
fn zero_hidden_units_are_an_invalid_dimension() {
    let dataset = Dataset::<f32>::moons(20, 0.20, 0).unwrap();
    let err = Trainer::new(dataset, hyper(0, 0.01), Backend::Serial).err();

    assert!(matches!(err, Some(MlErr::InvalidDimension { .. })));
}

#[test]
#[ignore = "reference run, takes minutes: 20000 full-batch steps over 5000 samples and 1000 hidden units"]
fn reference_scenario_loss_decreases() {
    let dataset = Dataset::<f32>::moons(5000, 0.20, 0).unwrap();
    let mut trainer = Trainer::new(dataset, hyper(1000, 0.01), Backend::Parallel).unwrap();

    let reports = trainer.train(20000, NonZeroUsize::new(1000)).unwrap();
    assert_eq!(reports.len(), 20);

    let at = |i| reports.iter().find(|r| r.iteration == i).unwrap().loss;
    assert!(at(0) > at(19000), "{} vs {}", at(0), at(19000));
}
