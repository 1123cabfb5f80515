//! Recognition Service (注册 / 识别)
//!
//! Wires the black-box feature extractor, the matcher and the employee
//! store together: enroll stores an encoding, identify scans active
//! employees' stored encodings for the nearest match.

use std::sync::Arc;

use tracing::{info, warn};

use super::{FaceMatcher, FeatureVector};
use crate::core::Clock;
use crate::db::repository::EmployeeRepository;
use crate::utils::{AppError, AppResult};

/// 外部视觉库能力: 从原始图片字节提取特征向量
///
/// Image decoding and pixel-level extraction live outside the core; `None`
/// means no usable face was found in the image.
pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, image: &[u8]) -> Option<FeatureVector>;
}

/// Successful identification result
#[derive(Debug, Clone)]
pub struct MatchHit {
    pub employee_id: i64,
    /// 员工编号快照
    pub code: String,
    /// 姓名快照
    pub name: String,
    /// 匹配距离 (lower = better)
    pub distance: f64,
}

/// 人脸注册与识别服务
pub struct RecognitionService {
    matcher: FaceMatcher,
    extractor: Arc<dyn FeatureExtractor>,
    employees: EmployeeRepository,
    clock: Arc<dyn Clock>,
}

impl RecognitionService {
    pub fn new(
        matcher: FaceMatcher,
        extractor: Arc<dyn FeatureExtractor>,
        employees: EmployeeRepository,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            matcher,
            extractor,
            employees,
            clock,
        }
    }

    /// Register (or replace) an employee's face encoding.
    pub fn enroll(&self, employee_id: i64, image: &[u8]) -> AppResult<()> {
        let employee = self
            .employees
            .find_by_id(employee_id)?
            .ok_or_else(|| AppError::not_found(format!("Employee {employee_id} not found")))?;

        let features = self
            .extractor
            .extract(image)
            .ok_or_else(|| AppError::invalid_input("No face detected in image"))?;

        self.employees.set_face_encoding(
            employee_id,
            features.to_json_string(),
            self.clock.now(),
        )?;
        info!(employee_id, code = %employee.code, "Face encoding enrolled");
        Ok(())
    }

    /// Identify the employee in an image.
    ///
    /// Returns `Ok(None)` when no face is found or nothing matches within
    /// tolerance. A corrupt stored encoding is logged and skipped; one bad
    /// row must not abort the scan for everyone else.
    pub fn identify(&self, image: &[u8]) -> AppResult<Option<MatchHit>> {
        let unknown = match self.extractor.extract(image) {
            Some(features) => features,
            None => return Ok(None),
        };
        self.identify_features(&unknown)
    }

    /// Identify from an already-extracted vector (kiosk check-in path).
    pub fn identify_features(&self, unknown: &FeatureVector) -> AppResult<Option<MatchHit>> {
        let employees = self.employees.find_active()?;

        let mut known = Vec::new();
        for employee in &employees {
            let Some(id) = employee.id else { continue };
            let Some(raw) = &employee.face_encoding else {
                continue;
            };
            match FeatureVector::from_json_str(raw) {
                Ok(features) => known.push((id, features)),
                Err(e) => {
                    warn!(employee_id = id, error = %e, "Skipping corrupt face encoding");
                }
            }
        }

        let Some((employee_id, distance)) = self.matcher.find_best_match(unknown, &known) else {
            return Ok(None);
        };

        let hit = employees
            .iter()
            .find(|e| e.id == Some(employee_id))
            .map(|e| MatchHit {
                employee_id,
                code: e.code.clone(),
                name: e.name.clone(),
                distance,
            });
        Ok(hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use crate::db::Db;
    use crate::db::models::EmployeeCreate;
    use chrono::NaiveDate;

    /// Extractor stub: passes the image bytes through as a vector.
    struct BytesExtractor;

    impl FeatureExtractor for BytesExtractor {
        fn extract(&self, image: &[u8]) -> Option<FeatureVector> {
            if image.is_empty() {
                return None;
            }
            Some(FeatureVector::new(
                image.iter().map(|b| *b as f64 / 255.0).collect(),
            ))
        }
    }

    fn service() -> (RecognitionService, EmployeeRepository) {
        let db = Db::open_in_memory();
        let employees = EmployeeRepository::new(db);
        let clock = Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2025, 6, 2)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        ));
        let service = RecognitionService::new(
            FaceMatcher::new(0.6),
            Arc::new(BytesExtractor),
            employees.clone(),
            clock,
        );
        (service, employees)
    }

    fn create_employee(employees: &EmployeeRepository, code: &str) -> i64 {
        employees
            .create(
                EmployeeCreate {
                    code: code.into(),
                    name: format!("Employee {code}"),
                    phone: None,
                    email: None,
                    department: None,
                    position: None,
                    hire_date: None,
                    monthly_salary: 1600.0,
                },
                NaiveDate::from_ymd_opt(2025, 6, 1)
                    .unwrap()
                    .and_hms_opt(8, 0, 0)
                    .unwrap(),
            )
            .unwrap()
            .id
            .unwrap()
    }

    #[test]
    fn test_enroll_then_identify() {
        let (service, employees) = service();
        let id = create_employee(&employees, "EMP001");

        let image = [10, 200, 30, 90, 150, 60];
        service.enroll(id, &image).unwrap();

        let hit = service.identify(&image).unwrap().unwrap();
        assert_eq!(hit.employee_id, id);
        assert_eq!(hit.code, "EMP001");
        assert!(hit.distance < 1e-9);
    }

    #[test]
    fn test_identify_with_no_enrollments_returns_none() {
        let (service, employees) = service();
        create_employee(&employees, "EMP001");

        assert!(service.identify(&[1, 2, 3]).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_encoding_skipped() {
        let (service, employees) = service();
        let corrupt_id = create_employee(&employees, "EMP001");
        let good_id = create_employee(&employees, "EMP002");

        let now = NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        employees
            .set_face_encoding(corrupt_id, "{broken".into(), now)
            .unwrap();

        let image = [10, 200, 30, 90, 150, 60];
        service.enroll(good_id, &image).unwrap();

        let hit = service.identify(&image).unwrap().unwrap();
        assert_eq!(hit.employee_id, good_id);
    }

    #[test]
    fn test_enroll_without_face_is_invalid_input() {
        let (service, employees) = service();
        let id = create_employee(&employees, "EMP001");

        let err = service.enroll(id, &[]).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
