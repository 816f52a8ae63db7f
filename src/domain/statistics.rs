use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeStatistics {
    pub count: i64,
    pub sum: i64,
    pub avg: Option<f64>,
    pub max: Option<i32>,
    pub min: Option<i32>,
}

impl AgeStatistics {
    pub fn from_ages(ages: impl IntoIterator<Item = i32>) -> Self {
        let ages: Vec<i32> = ages.into_iter().collect();
        let count = ages.len() as i64;
        let sum: i64 = ages.iter().map(|age| i64::from(*age)).sum();
        Self {
            count,
            sum,
            avg: (count > 0).then(|| sum as f64 / count as f64),
            max: ages.iter().copied().max(),
            min: ages.iter().copied().min(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAgeAverage {
    #[serde(rename = "teamName")]
    pub team_name: String,
    #[serde(rename = "averageAge")]
    pub average_age: f64,
}

#[test]
fn test_statistics_of_no_ages() {
    let stats = AgeStatistics::from_ages(Vec::<i32>::new());
    assert_eq!(stats.count, 0);
    assert_eq!(stats.sum, 0);
    assert_eq!(stats.avg, None);
    assert_eq!(stats.max, None);
}

#[test]
fn test_statistics_of_ages() {
    let stats = AgeStatistics::from_ages([10, 20, 30, 40]);
    assert_eq!(stats.count, 4);
    assert_eq!(stats.sum, 100);
    assert_eq!(stats.avg, Some(25.0));
    assert_eq!(stats.max, Some(40));
    assert_eq!(stats.min, Some(10));
}
